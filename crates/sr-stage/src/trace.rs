//! StageTrace — A complete sequence of stage events for one spin
//!
//! A trace captures the full timeline of a spin, from the debit to the
//! return to idle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::taxonomy::Cue;

/// Trace (de)serialization failure
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete trace of stage events for one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Spin identifier (e.g., "spin-000042")
    pub spin_id: String,

    /// Machine identifier
    pub machine_id: String,

    /// Whether the spin ran with the turbo profile
    #[serde(default)]
    pub turbo: bool,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(spin_id: impl Into<String>, machine_id: impl Into<String>) -> Self {
        Self {
            spin_id: spin_id.into(),
            machine_id: machine_id.into(),
            turbo: false,
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Mark the trace as a turbo spin
    pub fn with_turbo(mut self, turbo: bool) -> Self {
        self.turbo = turbo;
        self
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        let first = self.events.first().map(|e| e.timestamp_ms).unwrap_or(0.0);
        let last = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0.0);
        last - first
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Get all reel stop events
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Cues in trigger order
    pub fn cues(&self) -> Vec<Cue> {
        self.events.iter().filter_map(|e| e.stage.cue()).collect()
    }

    /// Total win presented during this spin
    pub fn total_win(&self) -> f64 {
        self.events
            .iter()
            .rev()
            .find_map(|e| match &e.stage {
                Stage::WinPresent { win_amount, .. } => Some(*win_amount),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    /// Validate trace has required stages
    pub fn validate(&self) -> TraceValidation {
        let reel_starts = self.events_by_type("reel_spinning").len();
        let reel_stops = self.reel_stops().len();
        let has_win = self.total_win() > 0.0;

        TraceValidation {
            has_spin_start: self.has_stage("spin_start"),
            has_spin_end: self.has_stage("spin_end"),
            reel_stop_count: reel_stops as u8,
            has_all_reels: reel_stops > 0 && reel_stops == reel_starts,
            has_evaluate: self.has_stage("evaluate_wins"),
            has_win_present: has_win && self.has_stage("win_present"),
            has_win_clear: !has_win || self.has_stage("win_clear"),
        }
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            spin_id: self.spin_id.clone(),
            machine_id: self.machine_id.clone(),
            turbo: self.turbo,
            event_count: self.events.len(),
            duration_ms: self.duration_ms(),
            total_win: self.total_win(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub has_spin_start: bool,
    pub has_spin_end: bool,
    pub has_all_reels: bool,
    pub reel_stop_count: u8,
    pub has_evaluate: bool,
    pub has_win_present: bool,
    pub has_win_clear: bool,
}

impl TraceValidation {
    /// Check if trace is valid (has all required elements)
    pub fn is_valid(&self) -> bool {
        self.has_spin_start
            && self.has_spin_end
            && self.has_all_reels
            && self.has_evaluate
            && self.has_win_clear
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.has_spin_start {
            warnings.push("Missing SPIN_START event");
        }
        if !self.has_spin_end {
            warnings.push("Missing SPIN_END event");
        }
        if !self.has_all_reels {
            warnings.push("Not all reels have stop events");
        }
        if !self.has_evaluate {
            warnings.push("Missing EVALUATE_WINS event");
        }
        if !self.has_win_clear {
            warnings.push("Win presented but never cleared");
        }

        warnings
    }
}

/// Summary of a trace for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub spin_id: String,
    pub machine_id: String,
    pub turbo: bool,
    pub event_count: usize,
    pub duration_ms: f64,
    pub total_win: f64,
}

/// Collection of traces from one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceCollection {
    pub traces: Vec<StageTrace>,
}

impl TraceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trace: StageTrace) {
        self.traces.push(trace);
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Get summary stats
    pub fn stats(&self) -> CollectionStats {
        let total_wins: f64 = self.traces.iter().map(|t| t.total_win()).sum();
        let winning = self.traces.iter().filter(|t| t.total_win() > 0.0).count();
        let turbo = self.traces.iter().filter(|t| t.turbo).count();

        CollectionStats {
            trace_count: self.traces.len(),
            total_wins,
            average_win: if self.traces.is_empty() {
                0.0
            } else {
                total_wins / self.traces.len() as f64
            },
            winning_spins: winning,
            turbo_spins: turbo,
        }
    }
}

/// Stats for a trace collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub trace_count: usize,
    pub total_wins: f64,
    pub average_win: f64,
    pub winning_spins: usize,
    pub turbo_spins: usize,
}
