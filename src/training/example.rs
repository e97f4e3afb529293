//! Training examples and the history of self-play batches.
//!
//! One self-play run produces one [`ExampleBatch`]. Batches are kept in
//! production order by [`ExampleHistory`] and handed to a trainer
//! most-recent-first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::ACTION_SPACE;
use crate::error::Result;
use crate::nn::EncodedState;

/// One labeled position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Position encoded from the point of view of the player to move.
    pub state: EncodedState,

    /// Search distribution over all nine cells; illegal cells are 0.
    pub policy: [f32; ACTION_SPACE],

    /// Final result for the player to move: -1, 0 or +1.
    pub value: f32,
}

/// Examples from one self-play run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleBatch {
    examples: Vec<TrainingExample>,
}

impl ExampleBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one example.
    pub fn push(&mut self, example: TrainingExample) {
        self.examples.push(example);
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> {
        self.examples.iter()
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a batch written by [`ExampleBatch::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl FromIterator<TrainingExample> for ExampleBatch {
    fn from_iter<I: IntoIterator<Item = TrainingExample>>(iter: I) -> Self {
        Self {
            examples: iter.into_iter().collect(),
        }
    }
}

impl Extend<TrainingExample> for ExampleBatch {
    fn extend<I: IntoIterator<Item = TrainingExample>>(&mut self, iter: I) {
        self.examples.extend(iter);
    }
}

impl IntoIterator for ExampleBatch {
    type Item = TrainingExample;
    type IntoIter = std::vec::IntoIter<TrainingExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.into_iter()
    }
}

/// Batches in production order, optionally bounded.
///
/// When full, the oldest batch is dropped.
#[derive(Clone, Debug, Default)]
pub struct ExampleHistory {
    batches: VecDeque<ExampleBatch>,
    capacity: Option<usize>,
}

impl ExampleHistory {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `capacity` batches.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batches: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Append the newest batch.
    pub fn push(&mut self, batch: ExampleBatch) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.batches.len() >= capacity {
                self.batches.pop_front();
            }
        }
        self.batches.push_back(batch);
    }

    /// The newest batch.
    pub fn latest(&self) -> Option<&ExampleBatch> {
        self.batches.back()
    }

    /// Batches from newest to oldest.
    pub fn most_recent_first(&self) -> impl Iterator<Item = &ExampleBatch> {
        self.batches.iter().rev()
    }

    /// Number of batches held.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Number of examples across all batches.
    pub fn total_examples(&self) -> usize {
        self.batches.iter().map(ExampleBatch::len).sum()
    }
}
