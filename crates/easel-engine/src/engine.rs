//! The sync engine facade
//!
//! One [`SyncEngine`] instance per board. It owns the in-memory mirror of
//! the timeline and rows, the FIFO gate that serializes layout mutations,
//! and the per-project in-flight registry. The canvas handle is injected,
//! so the same engine drives the production REST client and the in-memory
//! test board alike.

use std::sync::Arc;

use easel_canvas::RemoteCanvas;
use easel_layout::LayoutConfig;
use parking_lot::RwLock;

use crate::error::SyncError;
use crate::gate::{InFlight, TicketGate};
use crate::project::ProjectId;
use crate::state::{EngineState, ProjectRow, TimelineState};

/// Mirrors studio projects onto a shared, externally-editable whiteboard
///
/// All methods take `&self`; the engine is made for `Arc`-sharing across
/// request handlers. Internal state sits behind a [`RwLock`] that is only
/// held for short, await-free sections; waiting happens in the
/// [`TicketGate`](crate::gate::TicketGate) instead.
pub struct SyncEngine {
    /// Board access
    pub(crate) canvas: Arc<dyn RemoteCanvas>,
    /// Geometry rules
    pub(crate) layout: LayoutConfig,
    /// In-memory mirror of the board
    pub(crate) state: RwLock<EngineState>,
    /// FIFO serialization of layout mutations
    pub(crate) gate: TicketGate,
    /// Per-project duplicate-sync suppression
    pub(crate) in_flight: InFlight,
}

impl SyncEngine {
    /// Engine over a canvas with default layout rules
    #[must_use]
    pub fn new(canvas: Arc<dyn RemoteCanvas>) -> Self {
        Self {
            canvas,
            layout: LayoutConfig::default(),
            state: RwLock::new(EngineState::default()),
            gate: TicketGate::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Override the layout rules
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Layout rules in effect
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Snapshot of the timeline mirror, if initialized
    #[must_use]
    pub fn timeline_state(&self) -> Option<TimelineState> {
        self.state.read().timeline.clone()
    }

    /// Snapshot of a project's briefing row, if known
    #[must_use]
    pub fn project_row(&self, id: &ProjectId) -> Option<ProjectRow> {
        self.state.read().rows.get(id).cloned()
    }

    /// Timeline frame top edge, for layout-dependent callers
    #[must_use]
    pub fn timeline_top(&self) -> Option<f64> {
        self.state.read().timeline.as_ref().map(|t| t.top_anchor)
    }

    /// Timeline frame bottom edge
    #[must_use]
    pub fn timeline_bottom(&self) -> Option<f64> {
        self.state.read().timeline.as_ref().map(TimelineState::bottom)
    }

    /// Timeline frame right edge
    #[must_use]
    pub fn timeline_right_edge(&self) -> Option<f64> {
        self.state.read().timeline.as_ref().map(TimelineState::right)
    }

    /// Whether a sync for this project is running right now
    ///
    /// The only duplicate-safe pattern is to check here BEFORE calling
    /// [`sync_project`](SyncEngine::sync_project); a duplicate call that
    /// loses the race gets the cached card or a busy error, never a queue
    /// slot.
    #[inline]
    #[must_use]
    pub fn is_sync_in_progress(&self, id: &ProjectId) -> bool {
        self.in_flight.contains(id)
    }

    /// Layout-mutating operations queued or running
    #[inline]
    #[must_use]
    pub fn gate_depth(&self) -> u64 {
        self.gate.depth()
    }

    /// Forget all mirrored state; the board itself is untouched
    ///
    /// Maintenance tooling only. The next operation re-discovers everything
    /// from the live board.
    pub fn reset(&self) {
        self.state.write().clear();
        tracing::info!("engine state reset");
    }

    /// Cloned timeline state or the not-initialized error
    pub(crate) fn timeline_snapshot(&self) -> Result<TimelineState, SyncError> {
        self.state
            .read()
            .timeline
            .clone()
            .ok_or(SyncError::NotInitialized)
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("layout", &self.layout)
            .field("gate_depth", &self.gate.depth())
            .finish_non_exhaustive()
    }
}
