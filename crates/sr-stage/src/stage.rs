//! Stage — The core enum defining all canonical spin phases
//!
//! A Stage is NOT an animation and NOT a renderer command.
//! A Stage is the SEMANTIC MEANING of a moment in the spin flow.

use serde::{Deserialize, Serialize};

use crate::taxonomy::Cue;

/// Canonical spin stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted, bet debited
    SpinStart {
        /// Turbo timing profile selected for this spin
        #[serde(default)]
        turbo: bool,
    },

    /// Reel motion launched
    ReelSpinning {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Reel settled on its target
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Symbols on this reel (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All reels settled, grid being evaluated
    EvaluateWins,

    /// Spin complete, session back to idle
    SpinEnd,

    /// Spin request ignored because a spin is in flight
    SpinRejected,

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Win highlights and paylines shown
    WinPresent {
        /// Total payout
        win_amount: f64,
        /// Number of winning patterns
        pattern_count: u8,
    },

    /// Win visuals cleared
    WinClear,

    // ═══════════════════════════════════════════════════════════════════════
    // AUDIO / UI
    // ═══════════════════════════════════════════════════════════════════════
    /// Audio cue trigger
    Cue { cue: Cue },

    /// Spin and bet controls enabled or disabled
    Controls { enabled: bool },

    /// Turbo hold input asserted or released
    TurboHold { held: bool },

    /// Bet value changed
    BetChanged { bet: u32 },
}

impl Stage {
    /// Stable snake_case name of the stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd => "spin_end",
            Stage::SpinRejected => "spin_rejected",
            Stage::WinPresent { .. } => "win_present",
            Stage::WinClear => "win_clear",
            Stage::Cue { .. } => "cue",
            Stage::Controls { .. } => "controls",
            Stage::TurboHold { .. } => "turbo_hold",
            Stage::BetChanged { .. } => "bet_changed",
        }
    }

    /// Category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::ReelSpinning { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd
            | Stage::SpinRejected => StageCategory::SpinLifecycle,
            Stage::WinPresent { .. } | Stage::WinClear => StageCategory::WinLifecycle,
            Stage::Cue { .. } => StageCategory::Audio,
            Stage::Controls { .. } | Stage::TurboHold { .. } | Stage::BetChanged { .. } => {
                StageCategory::UI
            }
        }
    }

    /// Reel index for per-reel stages
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelSpinning { reel_index } | Stage::ReelStop { reel_index, .. } => {
                Some(*reel_index)
            }
            _ => None,
        }
    }

    /// Cue carried by this stage, if any
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Stage::Cue { cue } => Some(*cue),
            _ => None,
        }
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    WinLifecycle,
    Audio,
    UI,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::WinLifecycle => "Win Lifecycle",
            Self::Audio => "Audio",
            Self::UI => "UI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Stage::SpinStart { turbo: false }.type_name(), "spin_start");
        assert_eq!(
            Stage::ReelStop {
                reel_index: 2,
                symbols: vec![1, 2, 3]
            }
            .type_name(),
            "reel_stop"
        );
        assert_eq!(Stage::Cue { cue: Cue::ReelFall }.type_name(), "cue");
    }

    #[test]
    fn test_categories() {
        assert_eq!(Stage::EvaluateWins.category(), StageCategory::SpinLifecycle);
        assert_eq!(Stage::WinClear.category(), StageCategory::WinLifecycle);
        assert_eq!(Stage::Controls { enabled: true }.category(), StageCategory::UI);
        assert_eq!(
            Stage::Cue { cue: Cue::SpinClick }.category(),
            StageCategory::Audio
        );
    }

    #[test]
    fn test_tagged_serialization() {
        let stage = Stage::ReelSpinning { reel_index: 3 };
        let json = serde_json::to_string(&stage).unwrap();
        assert_eq!(json, r#"{"type":"reel_spinning","reel_index":3}"#);

        let back: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reel_index(), Some(3));
    }

    #[test]
    fn test_cue_accessor() {
        assert_eq!(
            Stage::Cue {
                cue: Cue::WinFiveLine
            }
            .cue(),
            Some(Cue::WinFiveLine)
        );
        assert_eq!(Stage::SpinEnd.cue(), None);
    }
}
