//! Arena-based search tree.
//!
//! Uses a flat `Vec<SearchNode>` with index-based references. A tree belongs
//! to exactly one decision and is dropped once that decision is made.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, SearchNode};
use crate::core::{Action, GameState};
use crate::error::Result;

/// Arena-based search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchTree {
    /// All nodes in the tree.
    nodes: Vec<SearchNode>,

    /// The root node ID (always 0).
    root: NodeId,
}

impl SearchTree {
    /// Create a tree holding only the root position.
    pub fn new(state: GameState) -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(SearchNode::root(state));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create one child per legal action of `id`, carrying `priors` in the
    /// same order. Does nothing if the node is already expanded or has no
    /// legal actions.
    pub fn expand(&mut self, id: NodeId, priors: &[f32]) -> Result<()> {
        if self.get(id).is_expanded() {
            return Ok(());
        }

        let state = self.get(id).state;
        let actions = state.legal_actions();
        debug_assert_eq!(actions.len(), priors.len(), "one prior per legal action");

        for (action, &prior) in actions.iter().zip(priors) {
            let child = SearchNode::child(state.next(*action)?, Some(*action), prior);
            let child_id = self.alloc(child);
            self.get_mut(id).children.push(child_id);
        }

        Ok(())
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SearchNode> + '_ {
        self.get(id).children.iter().map(move |&c| self.get(c))
    }

    /// (action, visit count) for each root child, in legal-action order.
    pub fn root_visits(&self) -> Vec<(Action, u32)> {
        self.children(self.root)
            .filter_map(|c| c.action.map(|a| (a, c.n)))
            .collect()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &SearchNode {
        self.get(self.root)
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            expanded_count: self.nodes.iter().filter(|n| n.is_expanded()).count(),
            terminal_count: self.nodes.iter().filter(|n| n.state.is_done()).count(),
        }
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Nodes with children.
    pub expanded_count: usize,

    /// Nodes holding finished games.
    pub terminal_count: usize,
}
