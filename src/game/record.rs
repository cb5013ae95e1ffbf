use serde::{Deserialize, Serialize};

/// One side's move in both notations
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveNotation {
    pub san: String,
    pub uci: String,
}

impl MoveNotation {
    pub fn clear(&mut self) {
        self.san.clear();
        self.uci.clear();
    }
}

/// Moves of the most recent turn
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: MoveNotation,
    pub model: MoveNotation,
}
