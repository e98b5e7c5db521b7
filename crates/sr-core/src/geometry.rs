//! Grid geometry — pure mapping between reel position, cells and pixels
//!
//! A reel is a circular buffer of `rows + extra_cells` cells stacked
//! vertically. The buffer scrolls downward as the reel's continuous
//! position grows; `extra_cells` of it sit above the visible window so the
//! window never shows a gap while the reel moves.
//!
//! ```text
//!   offset (px)
//!   -extra×cell ┌──────┐  buffer cells (hidden, above the window)
//!               │  ..  │
//!             0 ├──────┤ ─┐
//!               │ row0 │  │
//!               │ row1 │  │ visible window (rows × cell)
//!               │ row2 │  │
//!    rows×cell  └──────┘ ─┘
//! ```

use serde::{Deserialize, Serialize};

/// A grid coordinate (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    /// Row, 0 = top
    pub row: u8,
    /// Column (reel index), 0 = left
    pub col: u8,
}

impl CellPos {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Pixel coordinates relative to the top-left corner of the reel frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Reel grid dimensions and cell metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
    /// Cell edge length in pixels
    pub cell_size: f64,
    /// Horizontal gap between reels in pixels
    pub reel_gap: f64,
    /// Hidden buffer cells above the visible window
    pub extra_cells: u8,
}

impl GridGeometry {
    /// Standard 5×3 grid, 110px cells, 14px gaps, 8 buffer cells
    pub fn standard_5x3() -> Self {
        Self {
            reels: 5,
            rows: 3,
            cell_size: 110.0,
            reel_gap: 14.0,
            extra_cells: 8,
        }
    }

    /// Cells per reel buffer
    pub fn buffer_len(&self) -> usize {
        self.rows as usize + self.extra_cells as usize
    }

    /// Height of the full circular buffer in pixels
    pub fn buffer_height(&self) -> f64 {
        self.buffer_len() as f64 * self.cell_size
    }

    /// Height of the hidden margin above the visible window
    pub fn margin_height(&self) -> f64 {
        self.extra_cells as f64 * self.cell_size
    }

    /// Width of the visible reel frame
    pub fn frame_width(&self) -> f64 {
        let reels = self.reels as f64;
        reels * self.cell_size + (reels - 1.0).max(0.0) * self.reel_gap
    }

    /// Height of the visible reel frame
    pub fn frame_height(&self) -> f64 {
        self.rows as f64 * self.cell_size
    }

    /// Left edge of a reel column
    pub fn reel_x(&self, col: u8) -> f64 {
        col as f64 * (self.cell_size + self.reel_gap)
    }

    /// Vertical offset of buffer cell `index` for a continuous reel `position`.
    ///
    /// `position` is measured in cells. Cells stay evenly spaced for any
    /// position, so the window never shows a gap regardless of drift.
    pub fn cell_offset(&self, index: usize, position: f64) -> f64 {
        let len = self.buffer_len() as f64;
        let total = self.buffer_height();
        let base = position.rem_euclid(len) * self.cell_size;
        (index as f64 * self.cell_size + base).rem_euclid(total) - self.margin_height()
    }

    /// Offset of buffer cell `index` before the reel has ever moved
    pub fn initial_offset(&self, index: usize) -> f64 {
        (index as f64 - self.extra_cells as f64) * self.cell_size
    }

    /// True when an offset lies inside the visible window
    pub fn is_visible(&self, offset: f64) -> bool {
        offset >= 0.0 && offset < self.frame_height()
    }

    /// Vertical center of a visible row
    pub fn row_center(&self, row: u8) -> f64 {
        row as f64 * self.cell_size + self.cell_size / 2.0
    }

    /// Top-left corner of a cell in frame coordinates
    pub fn cell_origin(&self, pos: CellPos) -> Point {
        Point {
            x: self.reel_x(pos.col),
            y: pos.row as f64 * self.cell_size,
        }
    }

    /// Center of a cell in frame coordinates (payline anchor)
    pub fn cell_center(&self, pos: CellPos) -> Point {
        let origin = self.cell_origin(pos);
        Point {
            x: origin.x + self.cell_size / 2.0,
            y: origin.y + self.cell_size / 2.0,
        }
    }

    /// Inverse mapping: frame pixel to grid cell (gaps map to `None`)
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellPos> {
        if x < 0.0 || y < 0.0 || x >= self.frame_width() || y >= self.frame_height() {
            return None;
        }
        let pitch = self.cell_size + self.reel_gap;
        let col = (x / pitch).floor();
        if x - col * pitch >= self.cell_size {
            return None;
        }
        let row = (y / self.cell_size).floor();
        Some(CellPos::new(row as u8, col as u8))
    }

    /// Total visible positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::standard_5x3()
    }
}
