//! Search node structures.
//!
//! Uses arena-based allocation with index references (NodeId) so the tree
//! can be walked iteratively without recursion or shared ownership.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, GameState, ACTION_SPACE};

/// Index into the SearchTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A node in the search tree.
///
/// `w` and `n` are kept from the point of view of the player to move at
/// this node. A parent reads a child's mean value negated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode {
    /// Position this node represents.
    pub state: GameState,

    /// Move that led here from the parent (`None` for the root).
    pub action: Option<Action>,

    /// Cumulative value.
    pub w: f64,

    /// Visit count.
    pub n: u32,

    /// Prior probability from the predictor. Uniform for rollout trees.
    pub prior: f32,

    /// One child per legal action, in legal-action order. Empty until expanded.
    pub children: SmallVec<[NodeId; ACTION_SPACE]>,
}

impl SearchNode {
    /// Create a root node.
    pub fn root(state: GameState) -> Self {
        Self::child(state, None, 1.0)
    }

    /// Create an unvisited child node.
    pub fn child(state: GameState, action: Option<Action>, prior: f32) -> Self {
        Self {
            state,
            action,
            w: 0.0,
            n: 0,
            prior,
            children: SmallVec::new(),
        }
    }

    /// Check whether children have been created.
    #[inline]
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Mean value from this node's own perspective, 0 when unvisited.
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.w / self.n as f64
        }
    }

    /// Fold one evaluation result into the statistics.
    #[inline]
    pub fn merge(&mut self, value: f64) {
        self.w += value;
        self.n += 1;
    }
}
