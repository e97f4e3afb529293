//! Predictor traits for policy and value estimates.
//!
//! These traits are the boundary between the searches and whatever model
//! produces the estimates (typically a network trained outside this crate).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::encoder::{PlaneEncoder, StateEncoder};
use crate::core::{GameState, ACTION_SPACE};
use crate::error::{Error, Result};

/// Encoded game state as a flat tensor for model input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor (e.g., [channels, height, width]).
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the tensor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Output of one predictor call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Non-negative weight per legal action, in legal-action order.
    pub policy: Vec<f32>,

    /// Expected result for the player to move, in [-1, 1].
    pub value: f32,
}

/// Policy and value estimates for a position.
///
/// Implementations take `&self` only and must be safe to call from several
/// search threads at once.
pub trait Predictor: Send + Sync {
    /// Estimate policy (over legal actions) and value for `state`.
    fn predict(&self, state: &GameState) -> Result<Prediction>;

    /// Batch prediction for multiple states (optional optimization).
    fn predict_batch(&self, states: &[GameState]) -> Result<Vec<Prediction>> {
        states.iter().map(|s| self.predict(s)).collect()
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        (**self).predict(state)
    }

    fn predict_batch(&self, states: &[GameState]) -> Result<Vec<Prediction>> {
        (**self).predict_batch(states)
    }
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        (**self).predict(state)
    }

    fn predict_batch(&self, states: &[GameState]) -> Result<Vec<Prediction>> {
        (**self).predict_batch(states)
    }
}

/// A model over encoded states with a full-size policy head.
///
/// Returns (policy over all 9 cells, value).
pub trait PolicyValueNetwork: Send + Sync {
    /// Single forward pass.
    fn forward(&self, encoded: &EncodedState) -> Result<(Vec<f32>, f32)>;
}

/// Adapts a [`PolicyValueNetwork`] into a [`Predictor`].
///
/// Encodes the state, keeps only the policy entries of legal actions, and
/// normalizes them.
#[derive(Clone, Debug)]
pub struct NetworkPredictor<N, E = PlaneEncoder> {
    network: N,
    encoder: E,
}

impl<N: PolicyValueNetwork> NetworkPredictor<N> {
    /// Wrap a network using the default plane encoding.
    pub fn new(network: N) -> Self {
        Self {
            network,
            encoder: PlaneEncoder,
        }
    }
}

impl<N: PolicyValueNetwork, E: StateEncoder> NetworkPredictor<N, E> {
    /// Wrap a network with a custom encoder.
    pub fn with_encoder(network: N, encoder: E) -> Self {
        Self { network, encoder }
    }

    /// Get the wrapped network.
    pub fn network(&self) -> &N {
        &self.network
    }
}

impl<N: PolicyValueNetwork, E: StateEncoder> Predictor for NetworkPredictor<N, E> {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        let encoded = self.encoder.encode(state);
        let (full, value) = self.network.forward(&encoded)?;

        if full.len() != ACTION_SPACE {
            return Err(Error::Predictor {
                message: format!(
                    "policy head has {} entries, expected {ACTION_SPACE}",
                    full.len()
                ),
            });
        }

        let legal: Vec<f32> = state
            .legal_actions()
            .iter()
            .map(|a| full[a.index()])
            .collect();

        Ok(Prediction {
            policy: normalize_policy(&legal),
            value,
        })
    }
}

/// Uniform policy and zero value (baseline for testing and bootstrapping).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        Ok(Prediction {
            policy: uniform_priors(state.legal_actions().len()),
            value: 0.0,
        })
    }
}

/// Uniform distribution over `n` actions.
#[must_use]
pub fn uniform_priors(n: usize) -> Vec<f32> {
    if n == 0 {
        return vec![];
    }
    vec![1.0 / n as f32; n]
}

/// Scale weights to sum to 1.
///
/// Negative or non-finite entries count as 0. If nothing positive remains,
/// falls back to a uniform distribution.
#[must_use]
pub fn normalize_policy(weights: &[f32]) -> Vec<f32> {
    let cleaned: Vec<f32> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let total: f32 = cleaned.iter().sum();

    if total > 0.0 && total.is_finite() {
        cleaned.iter().map(|w| w / total).collect()
    } else {
        uniform_priors(weights.len())
    }
}
