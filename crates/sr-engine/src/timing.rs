//! Timing profiles for reel motion and win presentation

use serde::{Deserialize, Serialize};

/// Timing profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Turbo hold timing
    Turbo,
}

impl TimingProfile {
    pub fn from_turbo(turbo: bool) -> Self {
        if turbo {
            Self::Turbo
        } else {
            Self::Normal
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Turbo => "Turbo",
        }
    }
}

/// Motion and presentation timing for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Profile type
    pub profile: TimingProfile,

    /// Shortest base spin duration (ms)
    pub spin_time_min_ms: u32,

    /// Longest base spin duration (ms)
    pub spin_time_max_ms: u32,

    /// Extra duration per reel column so columns stop in sequence (ms)
    pub reel_stagger_ms: u32,

    /// Minimum travel of reel 0, in cells
    pub base_turns: u32,

    /// Extra travel per reel column, in cells
    pub turns_per_reel: u32,

    /// Random extra travel, 0..=jitter cells
    pub turn_jitter: u32,

    /// Hold time of the win presentation after the dim fade (ms)
    pub win_pause_ms: f64,

    /// Dim overlay fade-in time (ms)
    pub dim_fade_ms: f64,

    /// Dim overlay target opacity
    pub dim_alpha: f64,
}

impl MotionProfile {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_time_min_ms: 900,
            spin_time_max_ms: 1400,
            reel_stagger_ms: 180,
            base_turns: 18,
            turns_per_reel: 3,
            turn_jitter: 3,
            win_pause_ms: 1500.0,
            dim_fade_ms: 140.0,
            dim_alpha: 0.78,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_time_min_ms: 240,
            spin_time_max_ms: 380,
            reel_stagger_ms: 60,
            base_turns: 10,
            turns_per_reel: 2,
            turn_jitter: 1,
            win_pause_ms: 300.0,
            dim_fade_ms: 80.0,
            dim_alpha: 0.55,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
        }
    }

    /// Duration range of a reel column (ms, inclusive)
    pub fn duration_bounds(&self, column: u8) -> (u32, u32) {
        let stagger = column as u32 * self.reel_stagger_ms;
        (
            self.spin_time_min_ms + stagger,
            self.spin_time_max_ms + stagger,
        )
    }

    /// Travel range of a reel column (cells, inclusive)
    pub fn turn_bounds(&self, column: u8) -> (u32, u32) {
        let base = self.base_turns + column as u32 * self.turns_per_reel;
        (base, base + self.turn_jitter)
    }

    /// Worst-case time until every reel has stopped
    pub fn longest_spin_ms(&self, reel_count: u8) -> u32 {
        self.duration_bounds(reel_count.saturating_sub(1)).1
    }

    /// Total win presentation time (fade + hold)
    pub fn presentation_ms(&self) -> f64 {
        self.dim_fade_ms + self.win_pause_ms
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::normal()
    }
}
