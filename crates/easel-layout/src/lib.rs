//! Easel Layout - pure geometry for the shared board
//!
//! No IO and no engine state lives here: every function maps a
//! [`LayoutConfig`] plus observed coordinates to target coordinates.
//! Keeping the rules pure is what makes the placement behavior testable
//! without a board: the engine reads actual item extents from the canvas and
//! feeds them in, so user-resized frames flow through the same arithmetic as
//! engine-created ones.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod rows;
pub mod timeline;

// Re-exports for convenience
pub use config::LayoutConfig;
pub use rows::GridCell;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
