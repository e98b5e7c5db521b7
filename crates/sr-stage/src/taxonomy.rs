//! Stage Taxonomy — Enums for presentation elements
//!
//! Audio cues and winning pattern shapes shared between the engine and
//! whatever renders it.

use serde::{Deserialize, Serialize};

/// Named audio cue triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Spin button pressed
    SpinClick,
    /// Symbols start falling (every spin)
    ReelFall,
    /// Win made only of three-in-a-row patterns
    WinThreeLine,
    /// Win containing a full five-across row
    WinFiveLine,
}

impl Cue {
    /// Stable cue name used by audio mappings
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpinClick => "spin_click",
            Self::ReelFall => "reel_fall",
            Self::WinThreeLine => "win_three_line",
            Self::WinFiveLine => "win_five_line",
        }
    }

    /// Whether this cue announces a win
    pub fn is_win_cue(&self) -> bool {
        matches!(self, Self::WinThreeLine | Self::WinFiveLine)
    }
}

/// Shape of a winning pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternShape {
    /// Every cell of a row matches
    FullRow,
    /// Three contiguous cells of a row match
    PartialRow,
    /// Three cells descending left to right
    DiagonalDown,
    /// Three cells ascending left to right
    DiagonalUp,
}

impl PatternShape {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FullRow => "FULL ROW",
            Self::PartialRow => "THREE IN A ROW",
            Self::DiagonalDown => "DIAGONAL",
            Self::DiagonalUp => "DIAGONAL",
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(self, Self::DiagonalDown | Self::DiagonalUp)
    }
}

/// A winning pattern as seen by presentation (payline drawing, value label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLine {
    pub shape: PatternShape,
    pub symbol_id: u32,
    /// Points as (row, col), in drawing order
    pub points: Vec<(u8, u8)>,
    pub value: f64,
}

impl WinLine {
    /// Label drawn at the midpoint of the payline, e.g. "$2.5"
    pub fn value_label(&self) -> String {
        format!("${:.1}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::SpinClick.name(), "spin_click");
        assert_eq!(Cue::ReelFall.name(), "reel_fall");
        assert_eq!(Cue::WinThreeLine.name(), "win_three_line");
        assert_eq!(Cue::WinFiveLine.name(), "win_five_line");
        assert!(Cue::WinFiveLine.is_win_cue());
        assert!(!Cue::ReelFall.is_win_cue());
    }

    #[test]
    fn test_cue_serde_matches_name() {
        let json = serde_json::to_string(&Cue::WinFiveLine).unwrap();
        assert_eq!(json, "\"win_five_line\"");
    }

    #[test]
    fn test_value_label() {
        let line = WinLine {
            shape: PatternShape::PartialRow,
            symbol_id: 4,
            points: vec![(0, 0), (0, 1), (0, 2)],
            value: 2.5,
        };
        assert_eq!(line.value_label(), "$2.5");
        assert!(!line.shape.is_diagonal());
        assert!(PatternShape::DiagonalUp.is_diagonal());
    }
}
