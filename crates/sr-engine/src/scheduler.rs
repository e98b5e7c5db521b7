//! Frame scheduler
//!
//! One loop advances every animating reel per tick. Completion is a
//! structured fan-in: each launched motion holds the sender of a bounded(1)
//! channel and [`SpinJoin`] owns every receiver.

use crossbeam_channel::{Receiver, TryRecvError};
use rand::Rng;
use sr_core::GridGeometry;

use crate::reel::{Reel, ReelSettled};
use crate::symbols::SymbolCatalog;

/// Default animation frame interval (60 fps)
pub const FRAME_MS: f64 = 1000.0 / 60.0;

// ═══════════════════════════════════════════════════════════════════════════
// SPIN JOIN
// ═══════════════════════════════════════════════════════════════════════════

/// Fan-in status
#[derive(Debug, Clone, PartialEq)]
pub enum JoinStatus {
    /// Some reels have not signalled yet
    Pending { remaining: usize },
    /// Every reel has signalled
    Complete(Vec<ReelSettled>),
}

/// Waits for the completion signal of every reel launched in one spin
#[derive(Debug)]
pub struct SpinJoin {
    pending: Vec<Option<Receiver<ReelSettled>>>,
    settled: Vec<ReelSettled>,
}

impl SpinJoin {
    pub fn new(receivers: Vec<Receiver<ReelSettled>>) -> Self {
        Self {
            pending: receivers.into_iter().map(Some).collect(),
            settled: Vec::new(),
        }
    }

    /// Reels still in flight
    pub fn remaining(&self) -> usize {
        self.pending.iter().filter(|rx| rx.is_some()).count()
    }

    /// Collect any signals that arrived, without blocking
    pub fn poll(&mut self) -> JoinStatus {
        for slot in self.pending.iter_mut() {
            let Some(rx) = slot.as_ref() else { continue };
            match rx.try_recv() {
                Ok(settled) => {
                    self.settled.push(settled);
                    *slot = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Reel motion dropped without a completion signal");
                    *slot = None;
                }
            }
        }

        match self.remaining() {
            0 => {
                let mut settled = self.settled.clone();
                settled.sort_by_key(|s| s.column);
                JoinStatus::Complete(settled)
            }
            remaining => JoinStatus::Pending { remaining },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FRAME SCHEDULER
// ═══════════════════════════════════════════════════════════════════════════

/// Advances all reels once per tick and owns the recycling switch
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    blur_gain: f64,
    recycling: bool,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new(blur_gain: f64) -> Self {
        Self {
            blur_gain,
            recycling: false,
            ticks: 0,
        }
    }

    /// Allow wrap recycling for the spin about to start
    pub fn begin_spin(&mut self) {
        self.recycling = true;
    }

    pub fn recycling(&self) -> bool {
        self.recycling
    }

    /// Ticks advanced since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every animating reel; returns the reels that settled this tick
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        reels: &mut [Reel],
        now_ms: f64,
        geometry: &GridGeometry,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> Vec<ReelSettled> {
        self.ticks += 1;
        let mut settled = Vec::new();
        for reel in reels.iter_mut() {
            if let Some(done) =
                reel.step(now_ms, geometry, catalog, rng, self.recycling, self.blur_gain)
            {
                log::debug!(
                    "Reel {} settled at position {} ({:.1}ms)",
                    done.column,
                    done.position,
                    done.settled_at_ms
                );
                settled.push(done);
            }
        }
        settled
    }

    /// Disable recycling and lay out every reel once more without touching symbols
    pub fn final_pass(&mut self, reels: &mut [Reel], geometry: &GridGeometry) {
        self.recycling = false;
        for reel in reels.iter_mut() {
            reel.layout_frozen(geometry);
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(10.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FRAME CLOCK
// ═══════════════════════════════════════════════════════════════════════════

/// Deterministic frame clock for headless drivers
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    now_ms: f64,
    frame_ms: f64,
}

impl FrameClock {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by one frame and return the new time
    pub fn tick(&mut self) -> f64 {
        self.now_ms += self.frame_ms;
        self.now_ms
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAME_MS)
    }
}
