//! State encoding for model input.

use crate::core::{Action, GameState};
use crate::nn::traits::EncodedState;

/// Encodes game state into tensors for model input.
pub trait StateEncoder: Send + Sync {
    /// Encode the position from the point of view of the player to move.
    fn encode(&self, state: &GameState) -> EncodedState;

    /// Get the shape of encoded states.
    fn output_shape(&self) -> Vec<usize>;
}

/// Two 3x3 binary planes, shape `[2, 3, 3]`.
///
/// Plane 0 holds the cells of the player to move, plane 1 the opponent's.
/// The encoding never says which seat is which, so one model serves both.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaneEncoder;

impl StateEncoder for PlaneEncoder {
    fn encode(&self, state: &GameState) -> EncodedState {
        let mut tensor = vec![0.0f32; 18];
        let own = state.own_cells();
        let enemy = state.enemy_cells();

        for action in Action::all() {
            let i = action.index();
            if own & (1 << i) != 0 {
                tensor[i] = 1.0;
            }
            if enemy & (1 << i) != 0 {
                tensor[9 + i] = 1.0;
            }
        }

        EncodedState::new(tensor, self.output_shape())
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![2, 3, 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_all_zero() {
        let encoded = PlaneEncoder.encode(&GameState::new());
        assert_eq!(encoded.shape, vec![2, 3, 3]);
        assert!(encoded.tensor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_planes_follow_player_to_move() {
        // X on 0 and 4, O on 8; O to move.
        let state = GameState::from_cells("X---X---O").unwrap();
        let encoded = PlaneEncoder.encode(&state);

        // Second player to move: own plane is O.
        assert_eq!(encoded.tensor[8], 1.0);
        assert_eq!(encoded.tensor[9], 1.0);
        assert_eq!(encoded.tensor[9 + 4], 1.0);
        assert_eq!(encoded.tensor.iter().sum::<f32>(), 3.0);
    }
}
