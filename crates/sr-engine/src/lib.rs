//! # sr-engine — Spin-and-resolve engine for SlotReel
//!
//! Drives a 5×3 reel slot machine: animates spinning reels, derives the
//! settled symbol grid, evaluates it against the pattern catalog and
//! sequences the stage events presentation reacts to.
//!
//! ## Architecture
//!
//! ```text
//! SpinSession (single writer: credit, bet, state)
//!     │
//!     ├── MotionController (per-reel duration / turns, normal or turbo)
//!     ├── FrameScheduler   (advances every animating Reel once per tick)
//!     │       └── SpinJoin (fan-in over per-reel completion channels)
//!     ├── extract_grid     (settled reels → ResultGrid)
//!     └── PayTable         (ResultGrid → WinResult)
//!           │
//!           v
//!     Vec<StageEvent> → presentation
//! ```
//!
//! Everything runs on the caller's frame clock: call
//! [`SpinSession::tick`] once per animation frame.

pub mod config;
pub mod easing;
pub mod extract;
pub mod motion;
pub mod paytable;
pub mod reel;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use easing::*;
pub use extract::*;
pub use motion::*;
pub use paytable::*;
pub use reel::*;
pub use scheduler::*;
pub use session::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
