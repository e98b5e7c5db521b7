//! Result extraction: settled reels → visible symbol grid

use serde::{Deserialize, Serialize};
use sr_core::{GridGeometry, SrError, SrResult};

use crate::reel::{Cell, Reel};
use crate::symbols::SymbolId;

/// ROWS × REELS matrix of symbol IDs, row-major.
///
/// Serialized as a list of rows; deserialization goes through [`ResultGrid::from_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<SymbolId>>", into = "Vec<Vec<SymbolId>>")]
pub struct ResultGrid {
    rows: u8,
    reels: u8,
    cells: Vec<SymbolId>,
}

impl ResultGrid {
    /// Build from rows (top to bottom). Rows must be non-empty and equally long.
    pub fn from_rows(rows: Vec<Vec<SymbolId>>) -> SrResult<Self> {
        let row_count = rows.len();
        let reel_count = rows.first().map(|r| r.len()).unwrap_or(0);
        if row_count == 0 || reel_count == 0 {
            return Err(SrError::Parse("grid must have at least one cell".into()));
        }
        if row_count > u8::MAX as usize || reel_count > u8::MAX as usize {
            return Err(SrError::Parse(format!(
                "grid {row_count}x{reel_count} is too large"
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != reel_count) {
            return Err(SrError::Parse(format!(
                "row {i} has {} cells, expected {reel_count}",
                row.len()
            )));
        }

        Ok(Self {
            rows: row_count as u8,
            reels: reel_count as u8,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build from columns (left to right, each top to bottom)
    pub fn from_columns(columns: &[Vec<SymbolId>]) -> SrResult<Self> {
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        if columns.iter().any(|c| c.len() != row_count) {
            return Err(SrError::Parse("columns differ in length".into()));
        }
        let rows = (0..row_count)
            .map(|r| columns.iter().map(|c| c[r]).collect())
            .collect();
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn reels(&self) -> u8 {
        self.reels
    }

    /// Symbol at `(row, col)`; panics when out of bounds
    pub fn get(&self, row: u8, col: u8) -> SymbolId {
        assert!(row < self.rows && col < self.reels, "cell ({row}, {col}) out of bounds");
        self.cells[row as usize * self.reels as usize + col as usize]
    }

    pub fn row(&self, row: u8) -> &[SymbolId] {
        let start = row as usize * self.reels as usize;
        &self.cells[start..start + self.reels as usize]
    }

    /// Column view, top to bottom
    pub fn column(&self, col: u8) -> Vec<SymbolId> {
        (0..self.rows).map(|r| self.get(r, col)).collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<SymbolId>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<SymbolId>>> for ResultGrid {
    type Error = SrError;

    fn try_from(rows: Vec<Vec<SymbolId>>) -> SrResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<ResultGrid> for Vec<Vec<SymbolId>> {
    fn from(grid: ResultGrid) -> Self {
        grid.to_rows()
    }
}

/// Exactly `rows` cells of a settled reel, top to bottom.
///
/// Normally the visible cells sorted by offset. When the visible count is
/// off, each row takes the unused cell whose center is nearest the row center.
pub fn visible_cells<'a>(reel: &'a Reel, geometry: &GridGeometry) -> Vec<&'a Cell> {
    let rows = geometry.rows as usize;
    let mut visible: Vec<&Cell> = reel
        .cells()
        .iter()
        .filter(|c| geometry.is_visible(c.offset))
        .collect();

    if visible.len() == rows {
        visible.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        return visible;
    }

    log::warn!(
        "Reel {} shows {} visible cells, expected {}; using nearest-center fallback",
        reel.column(),
        visible.len(),
        rows
    );

    let half = geometry.cell_size / 2.0;
    let mut picked: Vec<usize> = Vec::with_capacity(rows);
    for row in 0..geometry.rows {
        let center = geometry.row_center(row);
        let nearest = reel
            .cells()
            .iter()
            .enumerate()
            .filter(|(i, _)| !picked.contains(i))
            .min_by(|(_, a), (_, b)| {
                let da = (a.offset + half - center).abs();
                let db = (b.offset + half - center).abs();
                da.total_cmp(&db)
            })
            .map(|(i, _)| i);
        if let Some(index) = nearest {
            picked.push(index);
        }
    }

    picked.iter().map(|&i| &reel.cells()[i]).collect()
}

/// Symbols of one settled reel, top to bottom
pub fn extract_column(reel: &Reel, geometry: &GridGeometry) -> Vec<SymbolId> {
    visible_cells(reel, geometry)
        .into_iter()
        .map(|c| c.symbol_id)
        .collect()
}

/// Result grid of all settled reels
pub fn extract_grid(reels: &[Reel], geometry: &GridGeometry) -> ResultGrid {
    let columns: Vec<Vec<SymbolId>> = reels
        .iter()
        .map(|reel| extract_column(reel, geometry))
        .collect();
    let rows = geometry.rows as usize;
    let cells = (0..rows)
        .flat_map(|r| columns.iter().map(move |c| c.get(r).copied().unwrap_or(0)))
        .collect();

    ResultGrid {
        rows: geometry.rows,
        reels: reels.len() as u8,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::symbols::SymbolCatalog;

    fn buffer(len: usize) -> Vec<SymbolId> {
        (0..len as u32).collect()
    }

    #[test]
    fn test_grid_from_rows() {
        let grid = ResultGrid::from_rows(vec![
            vec![1, 2, 3, 4, 5],
            vec![6, 7, 8, 9, 10],
            vec![11, 12, 13, 14, 0],
        ])
        .unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.reels(), 5);
        assert_eq!(grid.get(1, 2), 8);
        assert_eq!(grid.row(2), &[11, 12, 13, 14, 0]);
        assert_eq!(grid.column(4), vec![5, 10, 0]);
    }

    #[test]
    fn test_grid_rejects_ragged_rows() {
        assert!(ResultGrid::from_rows(vec![vec![1, 2, 3], vec![1, 2]]).is_err());
        assert!(ResultGrid::from_rows(vec![]).is_err());
        assert!(ResultGrid::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_grid_serializes_as_rows() {
        let grid = ResultGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[1,2,3],[4,5,6]]");

        let back: ResultGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_grid_deserialize_validates() {
        assert!(serde_json::from_str::<ResultGrid>("[[1,2,3],[4,5]]").is_err());
        assert!(serde_json::from_str::<ResultGrid>("[]").is_err());
        // Raw field layout cannot bypass validation
        assert!(
            serde_json::from_str::<ResultGrid>(r#"{"rows":3,"reels":5,"cells":[1,1]}"#).is_err()
        );
    }

    #[test]
    fn test_grid_from_columns() {
        let grid = ResultGrid::from_columns(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[test]
    fn test_visible_cells_at_rest() {
        let geometry = GridGeometry::standard_5x3();
        let mut reel = Reel::with_symbols(0, &geometry, &buffer(11));
        reel.layout_frozen(&geometry);

        let cells = visible_cells(&reel, &geometry);
        assert_eq!(cells.len(), 3);
        assert_eq!(
            cells.iter().map(|c| c.symbol_id).collect::<Vec<_>>(),
            vec![8, 9, 10]
        );
        assert_relative_eq!(cells[0].offset, 0.0);
        assert_relative_eq!(cells[1].offset, 110.0);
        assert_relative_eq!(cells[2].offset, 220.0);
    }

    #[test]
    fn test_snap_realigns_half_cell() {
        let geometry = GridGeometry::standard_5x3();
        let catalog = SymbolCatalog::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let mut reel = Reel::with_symbols(0, &geometry, &buffer(11));

        let rx = reel.begin(0.5, 0.0, 0.0);
        reel.step(0.0, &geometry, &catalog, &mut rng, false, 10.0);
        assert!(rx.try_recv().is_ok());

        // 0.5 rounds up to 1.0, which is aligned again
        let cells = visible_cells(&reel, &geometry);
        assert_eq!(cells.len(), 3);
        assert_eq!(
            cells.iter().map(|c| c.symbol_id).collect::<Vec<_>>(),
            vec![7, 8, 9]
        );
    }

    #[test]
    fn test_fallback_nearest_center() {
        let geometry = GridGeometry::standard_5x3();
        let mut reel = Reel::with_symbols(0, &geometry, &buffer(11));
        // Hand-placed offsets: 2 visible cells only
        let offsets = [
            -880.0, -770.0, -660.0, -550.0, -440.0, -330.0, -220.0, -100.0, 5.0, 120.0, 400.0,
        ];
        for (cell, offset) in reel.cells_mut().iter_mut().zip(offsets) {
            cell.offset = offset;
        }

        let cells = visible_cells(&reel, &geometry);
        assert_eq!(cells.len(), 3);
        // row 0 center 55 → cell 8 (5..115), row 1 center 165 → cell 9,
        // row 2 center 275 → cell 10 (400..510, distance 180) beats cell 7 (distance 320)
        assert_eq!(
            cells.iter().map(|c| c.symbol_id).collect::<Vec<_>>(),
            vec![8, 9, 10]
        );
    }

    #[test]
    fn test_extract_grid_row_major() {
        let geometry = GridGeometry::standard_5x3();
        let mut reels: Vec<Reel> = (0..5u8)
            .map(|c| {
                let symbols: Vec<SymbolId> = (0..11).map(|i| c as u32 * 100 + i).collect();
                Reel::with_symbols(c, &geometry, &symbols)
            })
            .collect();
        for reel in reels.iter_mut() {
            reel.layout_frozen(&geometry);
        }

        let grid = extract_grid(&reels, &geometry);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.reels(), 5);
        assert_eq!(grid.row(0), &[8, 108, 208, 308, 408]);
        assert_eq!(grid.row(2), &[10, 110, 210, 310, 410]);
        assert_eq!(grid.column(3), vec![308, 309, 310]);

        // Idempotent with no motion in between
        assert_eq!(extract_grid(&reels, &geometry), grid);
    }
}
