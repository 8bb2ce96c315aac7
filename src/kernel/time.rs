use serde::{Deserialize, Serialize};

/// Inference round counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Round {
    pub number: u64,
}

impl Round {
    pub fn new() -> Self {
        Round { number: 0 }
    }

    pub fn next(&self) -> Self {
        Round {
            number: self.number + 1,
        }
    }
}
