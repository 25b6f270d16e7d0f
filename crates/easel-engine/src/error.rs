//! Error types for the sync engine
//!
//! The taxonomy is deliberately small. Primary mutations propagate; anything
//! cosmetic is caught and logged at its call site and never shows up here.
//! Absence during discovery is a `None` or `false` result, not an error.

use easel_canvas::{CanvasError, ItemId};

use crate::project::{ProjectId, ProjectStatus};

/// Errors surfaced by sync engine operations
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A timeline operation ran before `initialize_timeline`
    #[error("timeline not initialized")]
    NotInitialized,

    /// The timeline has no column for this status
    #[error("no timeline column for status: {0}")]
    ColumnNotFound(ProjectStatus),

    /// A sync for this project is already running
    #[error("sync already in progress for project: {0}")]
    SyncInProgress(ProjectId),

    /// An engine-owned item was deleted out from under us
    #[error("canvas item vanished: {0}")]
    ItemVanished(ItemId),

    /// The canvas rejected or failed an operation
    #[error("canvas operation failed: {0}")]
    Canvas(#[from] CanvasError),
}

impl SyncError {
    /// Whether this is the benign duplicate-request rejection
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::SyncInProgress(_))
    }
}
