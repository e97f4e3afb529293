//! Action representation: a cell index on the 3x3 board.
//!
//! Cells are numbered row-major:
//!
//! ```text
//! 0 | 1 | 2
//! 3 | 4 | 5
//! 6 | 7 | 8
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Number of cells, which is also the size of the full action space.
pub const ACTION_SPACE: usize = 9;

/// Legal actions of one position. Never more than nine, so kept inline.
pub type ActionList = SmallVec<[Action; ACTION_SPACE]>;

/// Placing a mark on one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Action(u8);

impl Action {
    /// The center cell.
    pub const CENTER: Action = Action(4);

    /// The four corner cells.
    pub const CORNERS: [Action; 4] = [Action(0), Action(2), Action(6), Action(8)];

    /// Create an action for a cell, rejecting indices outside the board.
    pub fn new(index: usize) -> Result<Self> {
        if index < ACTION_SPACE {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidAction { index })
        }
    }

    /// Iterate over every cell in index order.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..ACTION_SPACE as u8).map(Action)
    }

    /// The cell index (0-8).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask for this cell.
    #[inline]
    #[must_use]
    pub(crate) const fn bit(self) -> u16 {
        1 << self.0
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_bounds() {
        assert_eq!(Action::new(0).unwrap().index(), 0);
        assert_eq!(Action::new(8).unwrap().index(), 8);
        assert!(matches!(Action::new(9), Err(Error::InvalidAction { index: 9 })));
    }

    #[test]
    fn test_action_all_in_order() {
        let cells: Vec<usize> = Action::all().map(Action::index).collect();
        assert_eq!(cells, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_action_bit() {
        assert_eq!(Action::CENTER.bit(), 0b1_0000);
        assert_eq!(Action::CORNERS[3].bit(), 1 << 8);
    }
}
