//! Predictor integration.
//!
//! The guided tree search consumes policy/value estimates through the
//! [`Predictor`] trait. Models that work on tensors implement
//! [`PolicyValueNetwork`] and are adapted with [`NetworkPredictor`].
//!
//! ## Overview
//!
//! - **Traits**: `Predictor`, `PolicyValueNetwork`
//! - **Encoding**: `StateEncoder` trait and the `PlaneEncoder` implementation
//! - **Baseline**: `UniformPredictor` for testing and bootstrapping
//!
//! ## Usage
//!
//! ```rust
//! use zero_ttt::core::GameState;
//! use zero_ttt::nn::{Predictor, UniformPredictor};
//!
//! let prediction = UniformPredictor.predict(&GameState::new()).unwrap();
//! assert_eq!(prediction.policy.len(), 9);
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{PlaneEncoder, StateEncoder};
pub use traits::{
    normalize_policy, uniform_priors, EncodedState, NetworkPredictor, PolicyValueNetwork,
    Prediction, Predictor, UniformPredictor,
};
