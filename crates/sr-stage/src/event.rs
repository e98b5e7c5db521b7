//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with timing and payload information.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;
use crate::taxonomy::WinLine;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Frame clock timestamp in milliseconds
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    // ═══ WIN DATA ═══
    /// Total win amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<f64>,

    /// Bet amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<f64>,

    /// Winning patterns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub win_lines: Vec<WinLine>,

    /// Deduplicated winning cells as (row, col)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub winning_cells: Vec<(u8, u8)>,

    // ═══ GRID DATA ═══
    /// Result grid (rows × reels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_grid: Option<Vec<Vec<u32>>>,

    // ═══ SESSION STATE ═══
    /// Credit after the stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,

    /// Spin ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<String>,
}

impl StagePayload {
    /// Payload carrying only the session balance
    pub fn balance(balance: f64) -> Self {
        Self {
            balance: Some(balance),
            ..Default::default()
        }
    }

    pub fn with_bet(mut self, bet: f64) -> Self {
        self.bet_amount = Some(bet);
        self
    }

    pub fn with_spin_id(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    pub fn with_win(mut self, amount: f64, lines: Vec<WinLine>, cells: Vec<(u8, u8)>) -> Self {
        self.win_amount = Some(amount);
        self.win_lines = lines;
        self.winning_cells = cells;
        self
    }

    pub fn with_grid(mut self, grid: Vec<Vec<u32>>) -> Self {
        self.result_grid = Some(grid);
        self
    }
}
