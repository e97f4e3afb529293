//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Stable identity of one of the two seats. The first player moves on the
//! empty board.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.
//!
//! ## Perspective
//!
//! Search values are always expressed from the point of view of the player
//! to move. [`to_reference`] is the only place that converts such a value
//! into the point of view of a fixed player.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Neg};

/// Stable player identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The player who moves on the empty board.
    pub const FIRST: PlayerId = PlayerId(0);

    /// The player who replies.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Get the raw player index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing player.
    #[must_use]
    pub const fn other(self) -> Self {
        PlayerId(1 - self.0)
    }

    /// Check if this is the first player.
    #[must_use]
    pub const fn is_first(self) -> bool {
        self.0 == 0
    }

    /// Both players in seat order.
    ///
    /// ```
    /// use zero_ttt::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(players, vec![PlayerId::FIRST, PlayerId::SECOND]);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        [PlayerId::FIRST, PlayerId::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Map a value from `mover`'s point of view into `reference`'s point of view.
///
/// Works for any negatable value (game results, search values).
///
/// ```
/// use zero_ttt::core::{to_reference, PlayerId};
///
/// assert_eq!(to_reference(1.0, PlayerId::SECOND, PlayerId::FIRST), -1.0);
/// assert_eq!(to_reference(1, PlayerId::FIRST, PlayerId::FIRST), 1);
/// ```
#[inline]
pub fn to_reference<T: Neg<Output = T>>(value: T, mover: PlayerId, reference: PlayerId) -> T {
    if mover == reference {
        value
    } else {
        -value
    }
}

/// Per-player data storage for the two seats.
///
/// ```
/// use zero_ttt::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(0);
/// wins[PlayerId::SECOND] += 1;
/// assert_eq!(wins[PlayerId::FIRST], 0);
/// assert_eq!(wins[PlayerId::SECOND], 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all().zip(self.data.iter())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }
}
