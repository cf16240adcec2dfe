use serde::{Deserialize, Serialize};

/// Fixed content of a board cell, decided at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Mine,
    /// Safe cell with the number of adjacent mines (0–8).
    Clear(u8),
}

impl Content {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// Player-visible disclosure state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Concealed,
    Flagged,
    Opened,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Concealed
    }
}

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Concealed,
    Flagged,
    Opened(u8),
    /// Mine disclosed at the end of a lost stage.
    Mine,
    /// The mine that ended the stage.
    Exploded,
}

impl Default for CellView {
    fn default() -> Self {
        Self::Concealed
    }
}
