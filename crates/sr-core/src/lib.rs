//! sr-core: Shared types for SlotReel
//!
//! This crate provides the foundational types used across all SlotReel crates:
//! the error taxonomy and the pure grid geometry that maps a continuous reel
//! position onto cell offsets and pixel coordinates.

mod error;
mod geometry;

pub use error::*;
pub use geometry::*;
