//! In-memory mirror of what the engine believes is on the board
//!
//! Everything here is a cache of convenience, not a source of truth. The
//! board outranks memory whenever they disagree: sync re-discovers items,
//! adopts survivors it did not know about, and purges entries whose remote
//! item vanished. Losing this state entirely (restart) costs one discovery
//! pass, nothing more.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use easel_canvas::ItemId;
use serde::Serialize;
use ulid::Ulid;

use crate::project::{DueDate, ProjectId, ProjectStatus};

/// Engine-local card identity, stable across remote item churn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(Ulid);

impl CardId {
    /// Mint a fresh identifier
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One Kanban column on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineColumn {
    /// Status this column holds
    pub status: ProjectStatus,
    /// Header label
    pub label: String,
    /// Header accent color
    pub color: String,
    /// Center x of the column band
    pub x: f64,
    /// Top edge of the drop zone
    pub y: f64,
    /// Band width
    pub width: f64,
}

impl TimelineColumn {
    /// Whether a card center x falls inside this column's band
    #[inline]
    #[must_use]
    pub fn band_contains(&self, x: f64) -> bool {
        easel_layout::timeline::in_column_band(self.x, self.width, x)
    }
}

/// The engine's view of one project card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineCard {
    /// Engine-local identity
    pub id: CardId,
    /// Project this card mirrors
    pub project_id: ProjectId,
    /// Project name at last sync
    pub project_name: String,
    /// Client label at last sync
    pub client_name: String,
    /// Deadline at last sync
    pub due: Option<DueDate>,
    /// Effective status at last sync
    pub status: ProjectStatus,
    /// Remote item behind this card, when known
    pub remote_id: Option<ItemId>,
    /// Center x at last sync
    pub x: f64,
    /// Center y at last sync
    pub y: f64,
}

/// Timeline frame, columns, and cards as last observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineState {
    /// Remote frame item
    pub frame_id: ItemId,
    /// Frame center x (never moves)
    pub frame_center_x: f64,
    /// Fixed top edge, recorded at creation or adoption
    ///
    /// Growth changes height and center but never this anchor. It is never
    /// recomputed from the center, or repeated grow cycles would walk the
    /// frame down the board.
    pub top_anchor: f64,
    /// Frame width
    pub frame_width: f64,
    /// Current frame height
    pub frame_height: f64,
    /// Columns, left to right
    pub columns: Vec<TimelineColumn>,
    /// Known cards
    pub cards: Vec<TimelineCard>,
    /// When the last sync finished
    pub last_sync_at: DateTime<Utc>,
}

impl TimelineState {
    /// Column for a status
    #[must_use]
    pub fn column(&self, status: ProjectStatus) -> Option<&TimelineColumn> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Column whose band contains `x`
    #[must_use]
    pub fn column_at(&self, x: f64) -> Option<&TimelineColumn> {
        self.columns.iter().find(|c| c.band_contains(x))
    }

    /// Card for a project
    #[must_use]
    pub fn card_for(&self, id: &ProjectId) -> Option<&TimelineCard> {
        self.cards.iter().find(|c| &c.project_id == id)
    }

    /// Mutable card for a project
    pub fn card_for_mut(&mut self, id: &ProjectId) -> Option<&mut TimelineCard> {
        self.cards.iter_mut().find(|c| &c.project_id == id)
    }

    /// Insert or replace the card for a project
    pub fn upsert_card(&mut self, card: TimelineCard) {
        match self.card_for_mut(&card.project_id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    /// Drop the card for a project
    pub fn remove_card(&mut self, id: &ProjectId) -> Option<TimelineCard> {
        let index = self.cards.iter().position(|c| &c.project_id == id)?;
        Some(self.cards.remove(index))
    }

    /// Frame left edge
    #[inline]
    #[must_use]
    pub fn left(&self) -> f64 {
        self.frame_center_x - self.frame_width / 2.0
    }

    /// Frame right edge
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.frame_center_x + self.frame_width / 2.0
    }

    /// Frame bottom edge
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top_anchor + self.frame_height
    }
}

/// One version frame in a project row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionState {
    /// Version number, 1-based
    pub number: u32,
    /// Remote frame item
    pub frame_id: ItemId,
    /// Center x at creation
    pub x: f64,
    /// Center y at creation
    pub y: f64,
}

/// Briefing row for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    /// Remote briefing frame
    pub briefing_frame_id: ItemId,
    /// Row center y
    pub row_y: f64,
    /// Client label at creation
    pub client_name: String,
    /// Version frames, oldest first
    pub versions: Vec<VersionState>,
    /// Fast-path handle to the status badge
    pub status_badge_id: Option<ItemId>,
    /// Fast-path handle to the due-date badge
    pub due_badge_id: Option<ItemId>,
    /// Fast-path handle to the done overlay
    pub done_overlay_id: Option<ItemId>,
}

impl ProjectRow {
    /// Latest version, if any
    #[inline]
    #[must_use]
    pub fn last_version(&self) -> Option<&VersionState> {
        self.versions.last()
    }

    /// Number the next version frame would get
    #[inline]
    #[must_use]
    pub fn next_version_number(&self) -> u32 {
        self.versions.last().map_or(1, |v| v.number + 1)
    }
}

/// Everything the engine remembers between calls
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineState {
    /// Timeline mirror, once initialized
    pub timeline: Option<TimelineState>,
    /// Briefing rows by project
    pub rows: HashMap<ProjectId, ProjectRow>,
}

impl EngineState {
    /// Forget everything; the next operation re-discovers from the board
    pub fn clear(&mut self) {
        self.timeline = None;
        self.rows.clear();
    }
}
