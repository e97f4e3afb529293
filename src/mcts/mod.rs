//! Monte Carlo Tree Search for tic-tac-toe.
//!
//! ## Overview
//!
//! Two tree searches share one arena tree and one iteration loop:
//!
//! - **UCB1 + rollouts**: leaves are valued by random playouts and expanded
//!   after a fixed number of visits.
//! - **PUCT + predictor**: leaves are valued by one predictor call and
//!   expanded immediately with the returned priors.
//!
//! Node statistics are negamax: `w` and `n` are kept from the point of
//! view of the player to move at that node.
//!
//! ## Usage
//!
//! ```rust
//! use zero_ttt::core::GameState;
//! use zero_ttt::mcts::{most_visited, RolloutEvaluator, SearchBudget, TreeSearch, Ucb1};
//!
//! let mut search = TreeSearch::new(Ucb1::default(), RolloutEvaluator::new(42, 10));
//! let tree = search
//!     .search(&GameState::new(), &SearchBudget::iterations(100))
//!     .unwrap();
//!
//! let total: u32 = tree.root_visits().iter().map(|&(_, n)| n).sum();
//! assert_eq!(total, 100);
//! assert!(most_visited(&tree).is_some());
//! ```

pub mod budget;
pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use budget::{CancelToken, SearchBudget};
pub use config::SearchConfig;
pub use node::{NodeId, SearchNode};
pub use policy::{
    LeafEvaluation, LeafEvaluator, PredictorEvaluator, Puct, RandomRollout, RolloutEvaluator,
    SelectionPolicy, Ucb1,
};
pub use search::{most_visited, TreeSearch};
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeStats};
