//! Pay table and win evaluation
//!
//! Evaluation is pure and exhaustive: every qualifying pattern pays and
//! payouts sum.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sr_core::CellPos;
use sr_stage::{Cue, PatternShape, WinLine};

use crate::extract::ResultGrid;
use crate::symbols::SymbolId;

/// Length of a partial row or diagonal
const SHORT_RUN: u8 = 3;

/// A winning arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub shape: PatternShape,
    pub symbol_id: SymbolId,
    /// Cells in drawing order
    pub points: Vec<CellPos>,
    pub value: f64,
}

impl Pattern {
    pub fn is_full_row(&self) -> bool {
        self.shape == PatternShape::FullRow
    }

    /// Presentation form of this pattern
    pub fn to_win_line(&self) -> WinLine {
        WinLine {
            shape: self.shape,
            symbol_id: self.symbol_id,
            points: self.points.iter().map(|p| (p.row, p.col)).collect(),
            value: self.value,
        }
    }
}

/// Outcome of evaluating one grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WinResult {
    /// Sum of all pattern values
    pub total: f64,
    /// Deduplicated union of pattern cells, row-major
    pub winning_cells: Vec<CellPos>,
    /// Patterns in evaluation order
    pub patterns: Vec<Pattern>,
}

impl WinResult {
    pub fn is_win(&self) -> bool {
        self.total > 0.0
    }

    /// A paying full-row pattern is present
    pub fn has_five_line(&self) -> bool {
        self.patterns.iter().any(|p| p.is_full_row() && p.value > 0.0)
    }

    /// A paying three-cell pattern is present
    pub fn has_three_line(&self) -> bool {
        self.patterns.iter().any(|p| !p.is_full_row() && p.value > 0.0)
    }

    /// Win cue for this result, `None` when nothing won
    pub fn cue(&self) -> Option<Cue> {
        if !self.is_win() {
            None
        } else if self.has_five_line() {
            Some(Cue::WinFiveLine)
        } else {
            Some(Cue::WinThreeLine)
        }
    }

    pub fn win_lines(&self) -> Vec<WinLine> {
        self.patterns.iter().map(Pattern::to_win_line).collect()
    }

    pub fn cell_pairs(&self) -> Vec<(u8, u8)> {
        self.winning_cells.iter().map(|p| (p.row, p.col)).collect()
    }
}

/// Pattern values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    /// Value of a row where every reel matches
    pub full_row_value: f64,
    /// Value of a partial row or diagonal of three
    pub three_value: f64,
}

impl PayTable {
    pub fn new(full_row_value: f64, three_value: f64) -> Self {
        Self {
            full_row_value,
            three_value,
        }
    }

    pub fn standard() -> Self {
        Self::new(5.0, 2.5)
    }

    /// Evaluate a grid against every pattern
    pub fn evaluate(&self, grid: &ResultGrid) -> WinResult {
        let mut patterns = Vec::new();

        // ═══ ROWS ═══
        for row in 0..grid.rows() {
            let cells = grid.row(row);
            let first = cells[0];
            if cells.iter().all(|&s| s == first) {
                patterns.push(Pattern {
                    shape: PatternShape::FullRow,
                    symbol_id: first,
                    points: (0..grid.reels()).map(|c| CellPos::new(row, c)).collect(),
                    value: self.full_row_value,
                });
                continue;
            }

            if let Some(start) = cells
                .windows(SHORT_RUN as usize)
                .position(|run| run.iter().all(|&s| s == run[0]))
            {
                let start = start as u8;
                patterns.push(Pattern {
                    shape: PatternShape::PartialRow,
                    symbol_id: cells[start as usize],
                    points: (start..start + SHORT_RUN)
                        .map(|c| CellPos::new(row, c))
                        .collect(),
                    value: self.three_value,
                });
            }
        }

        // ═══ DIAGONALS ═══
        if grid.rows() >= SHORT_RUN && grid.reels() >= SHORT_RUN {
            for col in 0..=grid.reels() - SHORT_RUN {
                for band in 0..=grid.rows() - SHORT_RUN {
                    let down: Vec<CellPos> = (0..SHORT_RUN)
                        .map(|k| CellPos::new(band + k, col + k))
                        .collect();
                    if let Some(symbol_id) = matching_symbol(grid, &down) {
                        patterns.push(Pattern {
                            shape: PatternShape::DiagonalDown,
                            symbol_id,
                            points: down,
                            value: self.three_value,
                        });
                    }

                    let up: Vec<CellPos> = (0..SHORT_RUN)
                        .map(|k| CellPos::new(band + SHORT_RUN - 1 - k, col + k))
                        .collect();
                    if let Some(symbol_id) = matching_symbol(grid, &up) {
                        patterns.push(Pattern {
                            shape: PatternShape::DiagonalUp,
                            symbol_id,
                            points: up,
                            value: self.three_value,
                        });
                    }
                }
            }
        }

        let winning_cells: BTreeSet<CellPos> = patterns
            .iter()
            .flat_map(|p| p.points.iter().copied())
            .collect();

        WinResult {
            total: patterns.iter().map(|p| p.value).sum(),
            winning_cells: winning_cells.into_iter().collect(),
            patterns,
        }
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Shared symbol of `points`, if they all match
fn matching_symbol(grid: &ResultGrid, points: &[CellPos]) -> Option<SymbolId> {
    let first = grid.get(points[0].row, points[0].col);
    points
        .iter()
        .all(|p| grid.get(p.row, p.col) == first)
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<SymbolId>>) -> ResultGrid {
        ResultGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_full_row_excludes_partial() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![1, 1, 1, 1, 1],
            vec![2, 3, 4, 5, 6],
            vec![7, 8, 9, 10, 11],
        ]));

        assert_eq!(result.total, 5.0);
        assert_eq!(result.patterns.len(), 1);
        assert_eq!(result.patterns[0].shape, PatternShape::FullRow);
        assert_eq!(result.winning_cells.len(), 5);
        assert_eq!(result.cue(), Some(Cue::WinFiveLine));
    }

    #[test]
    fn test_partial_row_takes_leftmost_run() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![1, 2, 3, 4, 5],
            vec![6, 4, 4, 4, 4],
            vec![7, 8, 9, 10, 11],
        ]));

        assert_eq!(result.total, 2.5);
        assert_eq!(result.patterns.len(), 1);
        let points = &result.patterns[0].points;
        assert_eq!(points.first(), Some(&CellPos::new(1, 1)));
        assert_eq!(points.last(), Some(&CellPos::new(1, 3)));
        assert_eq!(result.cue(), Some(Cue::WinThreeLine));
    }

    #[test]
    fn test_mixed_row_wins_sum() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![1, 1, 1, 1, 1],
            vec![2, 3, 2, 4, 2],
            vec![5, 5, 5, 6, 7],
        ]));

        assert_eq!(result.total, 7.5);
        assert!(result.has_five_line());
        assert!(result.has_three_line());
        let expected: Vec<CellPos> = (0..5)
            .map(|c| CellPos::new(0, c))
            .chain((0..3).map(|c| CellPos::new(2, c)))
            .collect();
        assert_eq!(result.winning_cells, expected);
    }

    #[test]
    fn test_descending_diagonal() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![9, 1, 2, 3, 4],
            vec![5, 9, 6, 7, 8],
            vec![10, 11, 9, 12, 13],
        ]));

        assert_eq!(result.total, 2.5);
        assert_eq!(result.patterns[0].shape, PatternShape::DiagonalDown);
        assert_eq!(
            result.winning_cells,
            vec![CellPos::new(0, 0), CellPos::new(1, 1), CellPos::new(2, 2)]
        );
    }

    #[test]
    fn test_ascending_diagonal_at_last_column() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![1, 2, 3, 4, 7],
            vec![5, 6, 8, 7, 9],
            vec![10, 11, 7, 12, 13],
        ]));

        assert_eq!(result.total, 2.5);
        assert_eq!(result.patterns[0].shape, PatternShape::DiagonalUp);
        assert_eq!(
            result.patterns[0].points,
            vec![CellPos::new(2, 2), CellPos::new(1, 3), CellPos::new(0, 4)]
        );
    }

    #[test]
    fn test_uniform_grid_pays_everything() {
        let result = PayTable::standard().evaluate(&grid(vec![vec![3; 5]; 3]));

        // 3 full rows + 3 start columns × 2 diagonals
        assert_eq!(result.patterns.len(), 9);
        assert_eq!(result.total, 3.0 * 5.0 + 6.0 * 2.5);
        assert_eq!(result.winning_cells.len(), 15);
    }

    #[test]
    fn test_no_win() {
        let rows: Vec<Vec<SymbolId>> = (0..3)
            .map(|r| (0..5).map(|c| r * 5 + c).collect())
            .collect();
        let result = PayTable::standard().evaluate(&grid(rows));

        assert!(!result.is_win());
        assert_eq!(result.total, 0.0);
        assert!(result.winning_cells.is_empty());
        assert_eq!(result.cue(), None);
    }

    #[test]
    fn test_evaluation_order() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![4, 4, 4, 1, 2],
            vec![3, 4, 3, 2, 5],
            vec![4, 6, 4, 8, 9],
        ]));

        let shapes: Vec<PatternShape> = result.patterns.iter().map(|p| p.shape).collect();
        assert_eq!(
            shapes,
            vec![
                PatternShape::PartialRow,
                PatternShape::DiagonalDown,
                PatternShape::DiagonalUp
            ]
        );
        assert_eq!(result.total, 7.5);
    }

    #[test]
    fn test_win_lines_match_patterns() {
        let result = PayTable::standard().evaluate(&grid(vec![
            vec![1, 1, 1, 1, 1],
            vec![2, 3, 2, 4, 2],
            vec![5, 5, 5, 6, 7],
        ]));
        let lines = result.win_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].points, vec![(2, 0), (2, 1), (2, 2)]);
        assert_eq!(lines[1].value_label(), "$2.5");
    }

    #[test]
    fn test_unpaid_full_row_keeps_three_line_cue() {
        let table = PayTable::new(0.0, 2.5);
        let result = table.evaluate(&grid(vec![
            vec![1, 1, 1, 1, 1],
            vec![2, 3, 2, 4, 2],
            vec![5, 5, 5, 6, 7],
        ]));

        assert_eq!(result.total, 2.5);
        assert!(!result.has_five_line());
        assert!(result.has_three_line());
        assert_eq!(result.cue(), Some(Cue::WinThreeLine));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let g = grid(vec![
            vec![1, 1, 1, 1, 1],
            vec![2, 3, 2, 4, 2],
            vec![5, 5, 5, 6, 7],
        ]);
        let table = PayTable::standard();
        assert_eq!(table.evaluate(&g), table.evaluate(&g));
    }
}
