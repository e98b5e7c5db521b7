//! Reel — one column's circular cell buffer and its motion state
//!
//! A reel owns `rows + extra_cells` cells. Its continuous `position` (cell
//! units) maps every cell to a vertical offset via
//! [`GridGeometry::cell_offset`]; cells that wrap from the bottom of the
//! buffer back to the top are the only ones that receive a new symbol.

use crossbeam_channel::{Receiver, Sender, bounded};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sr_core::GridGeometry;

use crate::easing::{ease_out_cubic, lerp};
use crate::symbols::{SymbolCatalog, SymbolId};

/// A slot in the reel's circular buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Symbol currently shown in this cell
    pub symbol_id: SymbolId,
    /// Vertical offset relative to the top of the visible window
    pub offset: f64,
    /// Offset of the previous layout pass (wrap detection)
    pub prev_offset: Option<f64>,
}

/// Per-reel motion state. `Animating` is the spinning state of the reel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReelMotion {
    #[default]
    Idle,
    Animating {
        start: f64,
        target: f64,
        started_at_ms: f64,
        duration_ms: f64,
    },
}

impl ReelMotion {
    pub fn is_animating(&self) -> bool {
        matches!(self, ReelMotion::Animating { .. })
    }
}

/// Completion signal sent once when a reel settles on its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelSettled {
    pub column: u8,
    pub position: f64,
    pub settled_at_ms: f64,
}

/// Render snapshot of one reel for a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelFrame {
    pub column: u8,
    /// Left edge of the reel column
    pub x: f64,
    /// Cell offsets in buffer order
    pub offsets: Vec<f64>,
    /// Cell symbols in buffer order
    pub symbols: Vec<SymbolId>,
    /// Motion blur intensity
    pub blur: f64,
    pub spinning: bool,
}

/// One reel column
#[derive(Debug)]
pub struct Reel {
    column: u8,
    cells: Vec<Cell>,
    position: f64,
    previous_position: f64,
    blur: f64,
    motion: ReelMotion,
    /// Every receiver handed out since the reel last settled
    completion: Vec<Sender<ReelSettled>>,
}

impl Reel {
    /// Build a reel with uniformly drawn symbols at its rest layout
    pub fn new<R: Rng + ?Sized>(
        column: u8,
        geometry: &GridGeometry,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> Self {
        let cells = (0..geometry.buffer_len())
            .map(|index| Cell {
                symbol_id: catalog.random_id(rng),
                offset: geometry.initial_offset(index),
                prev_offset: None,
            })
            .collect();

        Self {
            column,
            cells,
            position: 0.0,
            previous_position: 0.0,
            blur: 0.0,
            motion: ReelMotion::Idle,
            completion: Vec::new(),
        }
    }

    /// Build a reel from explicit symbols in buffer order (rest layout)
    pub fn with_symbols(column: u8, geometry: &GridGeometry, symbols: &[SymbolId]) -> Self {
        let cells = (0..geometry.buffer_len())
            .map(|index| Cell {
                symbol_id: symbols.get(index).copied().unwrap_or(0),
                offset: geometry.initial_offset(index),
                prev_offset: None,
            })
            .collect();

        Self {
            column,
            cells,
            position: 0.0,
            previous_position: 0.0,
            blur: 0.0,
            motion: ReelMotion::Idle,
            completion: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn column(&self) -> u8 {
        self.column
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn previous_position(&self) -> f64 {
        self.previous_position
    }

    pub fn blur(&self) -> f64 {
        self.blur
    }

    pub fn motion(&self) -> ReelMotion {
        self.motion
    }

    pub fn is_spinning(&self) -> bool {
        self.motion.is_animating()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MOTION
    // ═══════════════════════════════════════════════════════════════════════

    /// Start animating toward `target`.
    ///
    /// Returns the receiving half of this motion's completion channel. A
    /// reel already animating is retargeted; receivers from earlier calls
    /// stay connected and are signalled when the reel finally settles.
    pub fn begin(&mut self, target: f64, duration_ms: f64, now_ms: f64) -> Receiver<ReelSettled> {
        let (tx, rx) = bounded(1);
        self.motion = ReelMotion::Animating {
            start: self.position,
            target,
            started_at_ms: now_ms,
            duration_ms,
        };
        self.completion.push(tx);
        rx
    }

    /// Advance one frame.
    ///
    /// Returns the settle signal on the frame the motion completes.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        geometry: &GridGeometry,
        catalog: &SymbolCatalog,
        rng: &mut R,
        recycle: bool,
        blur_gain: f64,
    ) -> Option<ReelSettled> {
        let ReelMotion::Animating {
            start,
            target,
            started_at_ms,
            duration_ms,
        } = self.motion
        else {
            return None;
        };

        let t = if duration_ms > 0.0 {
            (now_ms - started_at_ms) / duration_ms
        } else {
            1.0
        };
        self.position = lerp(start, target, ease_out_cubic(t));

        if t >= 1.0 {
            self.position = target.round();
            self.relayout(geometry, catalog, rng, recycle);
            self.blur = 0.0;
            self.motion = ReelMotion::Idle;

            let settled = ReelSettled {
                column: self.column,
                position: self.position,
                settled_at_ms: now_ms,
            };
            for tx in self.completion.drain(..) {
                if tx.try_send(settled).is_err() {
                    log::debug!("Reel {} settled with no listener", self.column);
                }
            }
            return Some(settled);
        }

        let speed = (self.position - self.previous_position).abs();
        self.previous_position = self.position;
        self.blur = speed * blur_gain;
        self.relayout(geometry, catalog, rng, recycle);
        None
    }

    /// Reset blur derivation after the spin has been resolved
    pub fn settle_visuals(&mut self) {
        self.previous_position = self.position;
        self.blur = 0.0;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LAYOUT
    // ═══════════════════════════════════════════════════════════════════════

    /// Recompute offsets, redrawing symbols of wrapped cells.
    ///
    /// Returns the number of recycled cells.
    pub fn layout_recycling<R: Rng + ?Sized>(
        &mut self,
        geometry: &GridGeometry,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> usize {
        self.relayout(geometry, catalog, rng, true)
    }

    /// Recompute offsets without touching any symbol
    pub fn layout_frozen(&mut self, geometry: &GridGeometry) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let offset = geometry.cell_offset(index, self.position);
            cell.offset = offset;
            cell.prev_offset = Some(offset);
        }
    }

    fn relayout<R: Rng + ?Sized>(
        &mut self,
        geometry: &GridGeometry,
        catalog: &SymbolCatalog,
        rng: &mut R,
        recycle: bool,
    ) -> usize {
        if !recycle {
            self.layout_frozen(geometry);
            return 0;
        }

        let half = geometry.buffer_height() / 2.0;
        let mut recycled = 0;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let offset = geometry.cell_offset(index, self.position);
            let wrapped = cell.prev_offset.is_some_and(|prev| prev > offset + half);
            if wrapped {
                cell.symbol_id = catalog.random_id(rng);
                recycled += 1;
            }
            cell.offset = offset;
            cell.prev_offset = Some(offset);
        }
        recycled
    }

    /// Render snapshot
    pub fn frame(&self, geometry: &GridGeometry) -> ReelFrame {
        ReelFrame {
            column: self.column,
            x: geometry.reel_x(self.column),
            offsets: self.cells.iter().map(|c| c.offset).collect(),
            symbols: self.cells.iter().map(|c| c.symbol_id).collect(),
            blur: self.blur,
            spinning: self.is_spinning(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crossbeam_channel::TryRecvError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (GridGeometry, SymbolCatalog, StdRng) {
        (
            GridGeometry::standard_5x3(),
            SymbolCatalog::standard(),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_new_reel_rest_layout() {
        let (geometry, catalog, mut rng) = setup();
        let reel = Reel::new(2, &geometry, &catalog, &mut rng);

        assert_eq!(reel.cells().len(), 11);
        assert_eq!(reel.column(), 2);
        assert!(!reel.is_spinning());
        assert_relative_eq!(reel.cells()[0].offset, -880.0);
        assert_relative_eq!(reel.cells()[8].offset, 0.0);
        assert_relative_eq!(reel.cells()[10].offset, 220.0);
        assert!(reel.cells().iter().all(|c| c.prev_offset.is_none()));
    }

    #[test]
    fn test_step_reaches_target_and_signals() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        let rx = reel.begin(18.4, 900.0, 0.0);

        assert!(reel.is_spinning());
        assert!(reel.step(450.0, &geometry, &catalog, &mut rng, true, 10.0).is_none());
        assert!(reel.position() > 9.2, "ease-out covers more than half at t=0.5");
        assert!(reel.blur() > 0.0);
        assert!(rx.try_recv().is_err());

        let settled = reel
            .step(900.0, &geometry, &catalog, &mut rng, true, 10.0)
            .expect("settles at t = 1");
        assert_eq!(settled.column, 0);
        assert_eq!(settled.position, 18.0);
        assert_eq!(reel.position(), 18.0);
        assert_eq!(reel.blur(), 0.0);
        assert!(!reel.is_spinning());
        assert_eq!(rx.try_recv().ok(), Some(settled));

        // idle reels ignore further frames
        assert!(reel.step(1000.0, &geometry, &catalog, &mut rng, true, 10.0).is_none());
    }

    #[test]
    fn test_retarget_keeps_earlier_receiver_pending() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        let first = reel.begin(10.0, 500.0, 0.0);
        reel.step(250.0, &geometry, &catalog, &mut rng, true, 10.0);

        let second = reel.begin(20.0, 500.0, 250.0);
        assert!(matches!(first.try_recv(), Err(TryRecvError::Empty)));

        let settled = reel
            .step(750.0, &geometry, &catalog, &mut rng, true, 10.0)
            .expect("settles on the new target");
        assert_eq!(settled.position, 20.0);
        assert_eq!(first.try_recv().ok(), Some(settled));
        assert_eq!(second.try_recv().ok(), Some(settled));
    }

    #[test]
    fn test_zero_duration_completes_on_first_frame() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(1, &geometry, &catalog, &mut rng);
        let rx = reel.begin(5.0, 0.0, 100.0);

        let settled = reel.step(100.0, &geometry, &catalog, &mut rng, true, 10.0);
        assert!(settled.is_some());
        assert_eq!(reel.position(), 5.0);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_position_non_decreasing() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        reel.begin(21.0, 1000.0, 0.0);

        let mut last = reel.position();
        let mut now = 0.0;
        while reel.is_spinning() {
            now += 16.0;
            reel.step(now, &geometry, &catalog, &mut rng, true, 10.0);
            assert!(reel.position() >= last);
            last = reel.position();
        }
        assert_eq!(last, 21.0);
    }

    #[test]
    fn test_motionless_layout_never_recycles() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        reel.layout_frozen(&geometry);
        let before: Vec<_> = reel.cells().iter().map(|c| c.symbol_id).collect();

        for _ in 0..5 {
            assert_eq!(reel.layout_recycling(&geometry, &catalog, &mut rng), 0);
        }
        let after: Vec<_> = reel.cells().iter().map(|c| c.symbol_id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_wrap_recycles_only_wrapped_cells() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        reel.layout_frozen(&geometry);

        // Move by one cell: exactly the bottom cell (index 10) wraps to the top
        reel.position = 1.0;
        let recycled = reel.layout_recycling(&geometry, &catalog, &mut rng);
        assert_eq!(recycled, 1);
        assert_relative_eq!(reel.cells()[10].offset, -880.0);
        assert_relative_eq!(reel.cells()[7].offset, 0.0);
    }

    #[test]
    fn test_frozen_layout_keeps_symbols_across_wrap() {
        let (geometry, catalog, mut rng) = setup();
        let mut reel = Reel::new(0, &geometry, &catalog, &mut rng);
        reel.layout_frozen(&geometry);
        let before: Vec<_> = reel.cells().iter().map(|c| c.symbol_id).collect();

        reel.position = 3.0;
        reel.layout_frozen(&geometry);
        let after: Vec<_> = reel.cells().iter().map(|c| c.symbol_id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_frame_snapshot() {
        let (geometry, catalog, mut rng) = setup();
        let reel = Reel::new(3, &geometry, &catalog, &mut rng);
        let frame = reel.frame(&geometry);

        assert_eq!(frame.column, 3);
        assert_relative_eq!(frame.x, 372.0);
        assert_eq!(frame.offsets.len(), 11);
        assert_eq!(frame.symbols.len(), 11);
        assert!(!frame.spinning);
    }
}
