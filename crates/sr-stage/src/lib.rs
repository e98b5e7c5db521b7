//! # sr-stage — SlotReel Stage System
//!
//! Defines the canonical stages a spin passes through and the audio cues
//! presentation collaborators react to.
//!
//! ## Philosophy
//!
//! Presentation (graphics, audio, HUD) never inspects engine internals.
//! It consumes timestamped stage events:
//! - Spin starts → Reels stop → Wins evaluated → Win presented → Spin ends
//!
//! A complete spin is captured as a [`StageTrace`].

pub mod stage;
pub mod event;
pub mod trace;
pub mod taxonomy;

pub use stage::*;
pub use event::*;
pub use trace::*;
pub use taxonomy::*;
