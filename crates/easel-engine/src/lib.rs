//! Easel Engine - mirrors a studio's project roster onto a shared board
//!
//! The board is a whiteboard anyone can edit, so the mirror is built around
//! adoption rather than enforcement:
//! - One Kanban timeline frame with a column per workflow status and at most
//!   one card per project, correlated by identity tag
//! - One briefing row per project: a frame with badges and field cells plus
//!   a trail of version frames
//! - Cards already inside their column keep their exact position, frames
//!   grow but never shrink, and anything a human deleted is rebuilt or
//!   forgotten on the next pass
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use easel_canvas::{CanvasConfig, HttpCanvas};
//! use easel_engine::prelude::*;
//!
//! # async fn example(project: Project) -> Result<(), Box<dyn std::error::Error>> {
//! let canvas = HttpCanvas::new(CanvasConfig::new(
//!     "https://canvas.example.com/api/v2",
//!     "board-1",
//!     std::env::var("EASEL_CANVAS_TOKEN")?,
//! ));
//! let engine = SyncEngine::new(Arc::new(canvas));
//!
//! engine.initialize_timeline().await?;
//! let card = engine.sync_project(&project, SyncOptions::default()).await?;
//! println!("card at ({}, {})", card.x, card.y);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Public surface
pub mod engine;
pub mod error;
pub mod gate;
pub mod project;
pub mod state;
pub mod tag;

// Board interpretation and operations
mod discover;
mod rows;
mod sweeper;
mod timeline;

// Re-exports for convenience
pub use engine::SyncEngine;
pub use error::SyncError;
pub use project::{
    DueDate, Priority, Project, ProjectBriefing, ProjectId, ProjectStatus, SyncOptions,
};
pub use state::{EngineState, ProjectRow, TimelineCard, TimelineState, VersionState};

/// The types most callers need
pub mod prelude {
    pub use crate::engine::SyncEngine;
    pub use crate::error::SyncError;
    pub use crate::project::{
        DueDate, Priority, Project, ProjectBriefing, ProjectId, ProjectStatus, SyncOptions,
    };
    pub use crate::state::{ProjectRow, TimelineCard, TimelineState, VersionState};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
