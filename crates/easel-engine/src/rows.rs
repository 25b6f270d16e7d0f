//! Briefing rows: per-project frames, badges, field grids, versions
//!
//! Each mirrored project gets a row to the right of the timeline: a briefing
//! frame carrying badges and field cells, plus a trail of version frames
//! growing rightward. Frame titles are the durable identity here; the item
//! ids kept in [`ProjectRow`] are only fast-path hints that discovery
//! replaces whenever they go stale.

use chrono::{DateTime, Utc};
use easel_canvas::{CanvasItem, ItemId, ItemKind, ItemSpec, ItemStyle};
use easel_layout::rows as geometry;

use crate::discover::{self, BadgeQuery};
use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::project::{DueDate, Project, ProjectBriefing, ProjectId, ProjectStatus};
use crate::state::{ProjectRow, VersionState};
use crate::tag;
use crate::timeline::{FRAME_BORDER, FRAME_FILL, NEUTRAL_COLOR};

const PRIORITY_SLOT: usize = 0;
const CLIENT_SLOT: usize = 1;
const STATUS_SLOT: usize = 2;
const DUE_SLOT: usize = 3;

const PLACEHOLDER_TEXT: &str = "Needs input";
const PLACEHOLDER_FILL: &str = "#fdf3d8";
const VALUE_FILL: &str = "#f7f9fa";
const SECTION_FILL: &str = "#eef1f4";
const SECTION_LABELS: [&str; 2] = ["Moodboard", "Assets"];
const DUE_NEUTRAL_FILL: &str = "#e4e9ed";
const OVERLAY_FILL: &str = "#2e3440";
const OVERLAY_OPACITY: f64 = 0.45;

/// Text a due-date badge shows for a given date and approval state
fn due_badge_text(due: Option<&DueDate>, approved: bool) -> String {
    match due {
        Some(due) if approved => due.badge_label(),
        Some(due) => format!("{} (tbc)", due.badge_label()),
        None => "No due date".to_string(),
    }
}

/// A due badge turns the overdue color once the date has passed
fn due_badge_color(due: Option<&DueDate>, now: DateTime<Utc>) -> &'static str {
    match due {
        Some(due) if due.is_overdue_at(now) => ProjectStatus::Overdue.color(),
        _ => DUE_NEUTRAL_FILL,
    }
}

/// Rebuild row memory from what the board currently shows
fn row_from_board(
    frame: &CanvasItem,
    frames: &[CanvasItem],
    name: &str,
    client: &str,
) -> ProjectRow {
    let versions = discover::version_frames(frames, name)
        .into_iter()
        .map(|(number, item)| VersionState {
            number,
            frame_id: item.id.clone(),
            x: item.x,
            y: item.y,
        })
        .collect();
    ProjectRow {
        briefing_frame_id: frame.id.clone(),
        row_y: frame.y,
        client_name: client.to_string(),
        versions,
        status_badge_id: None,
        due_badge_id: None,
        done_overlay_id: None,
    }
}

impl SyncEngine {
    /// Create the full briefing row for a project, or adopt an existing one
    ///
    /// Idempotent by briefing frame title. A row the engine already knows is
    /// returned as-is; a matching frame made by someone else (or a previous
    /// engine run) is adopted together with whatever version frames its
    /// titles claim. Only when neither exists does the engine build the row:
    /// frame, header, badges, field grid, sections, and a first version.
    pub async fn create_project_row(
        &self,
        project: &Project,
        briefing: &ProjectBriefing,
    ) -> Result<ProjectRow, SyncError> {
        let _pass = self.gate.acquire().await;
        let timeline = self.timeline_snapshot()?;

        // 1. already known
        if let Some(row) = self.state.read().rows.get(&project.id).cloned() {
            return Ok(row);
        }

        // 2. already on the board
        let frames = self.canvas.list_by_kind(ItemKind::Frame).await?;
        if let Some(frame) = discover::find_briefing_frame(&frames, &project.name) {
            let row = row_from_board(frame, &frames, &project.name, project.client_label());
            self.state.write().rows.insert(project.id.clone(), row.clone());
            tracing::info!(project = %project.id, frame = %row.briefing_frame_id, "adopted briefing row");
            return Ok(row);
        }

        // 3. place below the lowest briefing frame on the board, measured
        //    from actual extents, or top-aligned with the timeline when first
        let area_left = geometry::row_area_left(&self.layout, timeline.right());
        let lowest = frames
            .iter()
            .filter(|f| f.title.starts_with("Briefing"))
            .map(CanvasItem::bottom)
            .reduce(f64::max);
        let row_y = match lowest {
            Some(bottom) => geometry::next_row_y(&self.layout, bottom),
            None => geometry::first_row_y(&self.layout, timeline.top_anchor),
        };

        // 4. frame and header
        let frame = self
            .canvas
            .create(
                ItemSpec::frame(
                    discover::briefing_title(&project.name),
                    geometry::briefing_x(&self.layout, area_left),
                    row_y,
                    self.layout.briefing_width,
                    self.layout.briefing_height,
                )
                .with_style(ItemStyle::fill(FRAME_FILL).with_border(FRAME_BORDER)),
            )
            .await?;
        let (header_x, header_y) =
            geometry::header_text_position(&self.layout, frame.x, frame.top());
        self.canvas
            .create(
                ItemSpec::text(
                    project.name.clone(),
                    header_x,
                    header_y,
                    self.layout.briefing_width - 64.0,
                    28.0,
                )
                .with_style(ItemStyle::default().with_font_size(22)),
            )
            .await?;

        // 5. badge row
        let now = Utc::now();
        let effective = project.effective_status(now);
        let badge_y = geometry::badge_row_y(&self.layout, frame.top());
        let left = frame.left();
        self.create_badge(
            geometry::badge_x(&self.layout, left, PRIORITY_SLOT),
            badge_y,
            "Priority",
            project.priority.label(),
            project.priority.color(),
        )
        .await?;
        self.create_badge(
            geometry::badge_x(&self.layout, left, CLIENT_SLOT),
            badge_y,
            "Client",
            project.client_label(),
            NEUTRAL_COLOR,
        )
        .await?;
        let status_badge = self
            .create_badge(
                geometry::badge_x(&self.layout, left, STATUS_SLOT),
                badge_y,
                "Status",
                effective.label(),
                effective.color(),
            )
            .await?;
        let due_badge = self
            .create_badge(
                geometry::badge_x(&self.layout, left, DUE_SLOT),
                badge_y,
                "Due",
                &due_badge_text(project.due.as_ref(), project.due_approved),
                due_badge_color(project.due.as_ref(), now),
            )
            .await?;

        // 6. field grid; empty fields get a visible placeholder
        let cells = geometry::field_cells(&self.layout, left, frame.top());
        for (cell, (label, value)) in cells.iter().zip(briefing.fields()) {
            self.canvas
                .create(
                    ItemSpec::text(label, cell.label_x, cell.label_y, cell.width, 18.0)
                        .with_style(ItemStyle::default().with_font_size(12)),
                )
                .await?;
            let (text, fill) = match value {
                Some(value) => (value.to_string(), VALUE_FILL),
                None => (PLACEHOLDER_TEXT.to_string(), PLACEHOLDER_FILL),
            };
            self.canvas
                .create(
                    ItemSpec::shape("", cell.x, cell.y, cell.width, cell.height)
                        .with_content(text)
                        .with_style(ItemStyle::fill(fill).with_border(FRAME_BORDER)),
                )
                .await?;
        }

        // 7. collection sections along the bottom edge
        let sections = geometry::section_cells(&self.layout, left, frame.bottom());
        for (cell, label) in sections.iter().zip(SECTION_LABELS) {
            self.canvas
                .create(
                    ItemSpec::shape(label, cell.x, cell.y, cell.width, cell.height)
                        .with_content(tag::furniture(&format!(
                            "section:{}",
                            label.to_lowercase()
                        )))
                        .with_style(ItemStyle::fill(SECTION_FILL)),
                )
                .await?;
        }

        // 8. first version frame, top-aligned with the briefing
        let version = self
            .create_version_frame(
                &project.name,
                1,
                geometry::first_version_x(&self.layout, frame.right()),
                frame.top(),
            )
            .await?;

        // 9. a project can arrive already finished
        let overlay_id = if effective.is_terminal() {
            Some(self.create_overlay(&frame).await?.id)
        } else {
            None
        };

        // 10. commit and bring the new row into view
        let row = ProjectRow {
            briefing_frame_id: frame.id.clone(),
            row_y,
            client_name: project.client_label().to_string(),
            versions: vec![version],
            status_badge_id: Some(status_badge.id),
            due_badge_id: Some(due_badge.id),
            done_overlay_id: overlay_id,
        };
        self.state.write().rows.insert(project.id.clone(), row.clone());
        if let Err(err) = self.canvas.focus_on(std::slice::from_ref(&frame.id)).await {
            tracing::warn!(error = %err, "viewport focus failed");
        }
        tracing::info!(project = %project.id, row_y, "briefing row created");
        Ok(row)
    }

    /// Add the next version frame to a project's row
    ///
    /// Returns `Ok(None)` when no row can be found or rebuilt, which callers
    /// treat as nothing-to-do rather than failure. Placement anchors on the
    /// rightmost version frame that still exists, measured by its actual
    /// right edge; entries whose frames were deleted from the board are
    /// pruned on the way.
    pub async fn add_version(
        &self,
        project_id: &ProjectId,
        project_name: Option<&str>,
    ) -> Result<Option<VersionState>, SyncError> {
        let _pass = self.gate.acquire().await;

        // 1. the row, from memory or rebuilt from frame titles
        let cached = self.state.read().rows.get(project_id).cloned();
        let mut row = match cached {
            Some(row) => row,
            None => {
                let Some(name) = project_name else {
                    tracing::debug!(project = %project_id, "no known row and no name to rebuild from");
                    return Ok(None);
                };
                let frames = self.canvas.list_by_kind(ItemKind::Frame).await?;
                let Some(frame) = discover::find_briefing_frame(&frames, name) else {
                    return Ok(None);
                };
                let row = row_from_board(frame, &frames, name, "");
                self.state.write().rows.insert(project_id.clone(), row.clone());
                tracing::info!(project = %project_id, "briefing row rebuilt from board");
                row
            }
        };

        // 2. the briefing frame must still exist
        let Some(briefing) = self.canvas.get_by_id(&row.briefing_frame_id).await? else {
            tracing::warn!(project = %project_id, "briefing frame gone; dropping row");
            self.state.write().rows.remove(project_id);
            return Ok(None);
        };
        let name = match project_name {
            Some(name) => name.to_string(),
            None => discover::briefing_name(&briefing.title),
        };

        // 3. anchor on the rightmost version frame that still exists
        let mut anchor = None;
        while let Some(last) = row.versions.last() {
            match self.canvas.get_by_id(&last.frame_id).await? {
                Some(item) => {
                    anchor = Some(item);
                    break;
                }
                None => {
                    tracing::debug!(project = %project_id, number = last.number, "version frame deleted externally; pruning");
                    row.versions.pop();
                }
            }
        }

        // 4. place after the anchor's actual right edge
        let number = row.next_version_number();
        let (x, top) = match &anchor {
            Some(item) => (
                geometry::next_version_x(&self.layout, item.right()),
                item.top(),
            ),
            None => (
                geometry::first_version_x(&self.layout, briefing.right()),
                briefing.top(),
            ),
        };
        let version = self.create_version_frame(&name, number, x, top).await?;

        // 5. commit
        row.versions.push(version.clone());
        self.state.write().rows.insert(project_id.clone(), row);
        tracing::info!(project = %project_id, version = number, x, "version frame added");
        Ok(Some(version))
    }

    /// Repaint the status badge on a project's briefing frame
    ///
    /// Cosmetic; `sync_project` logs failures instead of propagating them.
    /// Returns whether a badge was found and written.
    pub async fn update_briefing_status(
        &self,
        project_id: &ProjectId,
        status: ProjectStatus,
        project_name: &str,
    ) -> Result<bool, SyncError> {
        // 1. stored handle fast path
        let stored = self
            .state
            .read()
            .rows
            .get(project_id)
            .and_then(|r| r.status_badge_id.clone());
        if let Some(id) = stored {
            if let Some(mut badge) = self.canvas.get_by_id(&id).await? {
                badge.content = status.label().to_string();
                badge.style.fill_color = Some(status.color().to_string());
                self.canvas.update(&badge).await?;
                return Ok(true);
            }
        }

        // 2. discovery, then remember the handle for next time
        let Some(frame) = self.briefing_frame_for(project_id, project_name).await? else {
            return Ok(false);
        };
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let query = BadgeQuery {
            title: "Status",
            expected_x: geometry::badge_x(&self.layout, frame.left(), STATUS_SLOT),
            band_y: geometry::badge_row_y(&self.layout, frame.top()),
            band_tolerance: self.layout.badge_height,
            content: &discover::STATUS_CONTENT,
        };
        let Some(found) = discover::find_badge(&shapes, &frame, &query) else {
            tracing::debug!(project = %project_id, "status badge not found");
            return Ok(false);
        };
        let mut badge = found.clone();
        badge.content = status.label().to_string();
        badge.style.fill_color = Some(status.color().to_string());
        self.canvas.update(&badge).await?;
        if let Some(row) = self.state.write().rows.get_mut(project_id) {
            row.status_badge_id = Some(badge.id.clone());
        }
        Ok(true)
    }

    /// Rewrite the due-date badge on a project's briefing frame
    ///
    /// Unapproved dates render with a `(tbc)` suffix and a missing date as
    /// `No due date`; the badge turns the overdue color once the date has
    /// passed.
    pub async fn update_briefing_due_date(
        &self,
        project_id: &ProjectId,
        due: Option<&DueDate>,
        approved: bool,
        project_name: &str,
    ) -> Result<bool, SyncError> {
        let text = due_badge_text(due, approved);
        let color = due_badge_color(due, Utc::now());

        let stored = self
            .state
            .read()
            .rows
            .get(project_id)
            .and_then(|r| r.due_badge_id.clone());
        if let Some(id) = stored {
            if let Some(mut badge) = self.canvas.get_by_id(&id).await? {
                badge.content = text;
                badge.style.fill_color = Some(color.to_string());
                self.canvas.update(&badge).await?;
                return Ok(true);
            }
        }

        let Some(frame) = self.briefing_frame_for(project_id, project_name).await? else {
            return Ok(false);
        };
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let query = BadgeQuery {
            title: "Due",
            expected_x: geometry::badge_x(&self.layout, frame.left(), DUE_SLOT),
            band_y: geometry::badge_row_y(&self.layout, frame.top()),
            band_tolerance: self.layout.badge_height,
            content: &discover::DUE_CONTENT,
        };
        let Some(found) = discover::find_badge(&shapes, &frame, &query) else {
            tracing::debug!(project = %project_id, "due badge not found");
            return Ok(false);
        };
        let mut badge = found.clone();
        badge.content = text;
        badge.style.fill_color = Some(color.to_string());
        self.canvas.update(&badge).await?;
        if let Some(row) = self.state.write().rows.get_mut(project_id) {
            row.due_badge_id = Some(badge.id.clone());
        }
        Ok(true)
    }

    /// Veil or unveil a project's briefing frame with a translucent overlay
    ///
    /// Returns whether anything changed on the board.
    pub async fn handle_done_overlay(
        &self,
        project_id: &ProjectId,
        project_name: &str,
        done: bool,
    ) -> Result<bool, SyncError> {
        let _pass = self.gate.acquire().await;
        self.handle_done_overlay_locked(project_id, project_name, done)
            .await
    }

    /// Overlay logic for callers already holding a gate pass
    pub(crate) async fn handle_done_overlay_locked(
        &self,
        project_id: &ProjectId,
        project_name: &str,
        done: bool,
    ) -> Result<bool, SyncError> {
        let Some(frame) = self.briefing_frame_for(project_id, project_name).await? else {
            return Ok(false);
        };

        // stored handle first, then discovery by marker or by look
        let stored = self
            .state
            .read()
            .rows
            .get(project_id)
            .and_then(|r| r.done_overlay_id.clone());
        let mut existing = match stored {
            Some(id) => self.canvas.get_by_id(&id).await?,
            None => None,
        };
        if existing.is_none() {
            let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
            existing = discover::find_overlay(&shapes, &frame).cloned();
        }

        match (done, existing) {
            (true, Some(overlay)) => {
                self.remember_overlay(project_id, Some(overlay.id));
                Ok(false)
            }
            (true, None) => {
                let overlay = self.create_overlay(&frame).await?;
                self.remember_overlay(project_id, Some(overlay.id));
                tracing::info!(project = %project_id, "done overlay added");
                Ok(true)
            }
            (false, Some(overlay)) => {
                self.canvas.remove(&overlay.id).await?;
                self.remember_overlay(project_id, None);
                tracing::info!(project = %project_id, "done overlay removed");
                Ok(true)
            }
            (false, None) => Ok(false),
        }
    }

    /// Tear down a project's row: briefing frame, version frames, and every
    /// item inside them
    ///
    /// Works from memory, a name hint, or both; whatever can still be found
    /// is removed and absence of the rest is tolerated. Callers hold the
    /// gate pass.
    pub(crate) async fn remove_project_row_locked(
        &self,
        project_id: &ProjectId,
        name_hint: Option<&str>,
    ) -> Result<bool, SyncError> {
        let row = self.state.read().rows.get(project_id).cloned();
        let frames = self.canvas.list_by_kind(ItemKind::Frame).await?;

        // 1. the briefing frame, from the stored id or the name hint
        let mut briefing = None;
        if let Some(row) = &row {
            briefing = self.canvas.get_by_id(&row.briefing_frame_id).await?;
        }
        if briefing.is_none() {
            if let Some(name) = name_hint {
                briefing = discover::find_briefing_frame(&frames, name).cloned();
            }
        }
        let name = match (name_hint, &briefing) {
            (Some(hint), _) => Some(hint.to_string()),
            (None, Some(frame)) => Some(discover::briefing_name(&frame.title)),
            (None, None) => None,
        };

        // 2. version frames by title, plus remembered ids the scan missed
        let mut hosts: Vec<CanvasItem> = Vec::new();
        if let Some(name) = &name {
            for (_, item) in discover::version_frames(&frames, name) {
                hosts.push(item.clone());
            }
        }
        if let Some(row) = &row {
            for version in &row.versions {
                if hosts.iter().all(|known| known.id != version.frame_id) {
                    if let Some(item) = self.canvas.get_by_id(&version.frame_id).await? {
                        hosts.push(item);
                    }
                }
            }
        }
        if let Some(frame) = briefing {
            hosts.push(frame);
        }
        if hosts.is_empty() {
            return Ok(self.state.write().rows.remove(project_id).is_some());
        }

        // 3. everything visually inside a doomed frame goes with it
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let texts = self.canvas.list_by_kind(ItemKind::Text).await?;
        let mut doomed: Vec<ItemId> = Vec::new();
        for item in shapes.iter().chain(texts.iter()) {
            if hosts.iter().any(|frame| frame.contains_center_of(item)) {
                doomed.push(item.id.clone());
            }
        }
        doomed.extend(hosts.iter().map(|frame| frame.id.clone()));

        let count = doomed.len();
        futures::future::try_join_all(doomed.iter().map(|id| self.canvas.remove(id))).await?;
        self.state.write().rows.remove(project_id);
        tracing::info!(project = %project_id, items = count, "briefing row removed");
        Ok(true)
    }

    /// The briefing frame for a project: stored id first, then title search
    async fn briefing_frame_for(
        &self,
        project_id: &ProjectId,
        project_name: &str,
    ) -> Result<Option<CanvasItem>, SyncError> {
        let stored = self
            .state
            .read()
            .rows
            .get(project_id)
            .map(|r| r.briefing_frame_id.clone());
        if let Some(id) = stored {
            if let Some(frame) = self.canvas.get_by_id(&id).await? {
                return Ok(Some(frame));
            }
        }
        let frames = self.canvas.list_by_kind(ItemKind::Frame).await?;
        Ok(discover::find_briefing_frame(&frames, project_name).cloned())
    }

    async fn create_badge(
        &self,
        x: f64,
        y: f64,
        title: &str,
        content: &str,
        color: &str,
    ) -> Result<CanvasItem, SyncError> {
        let spec = ItemSpec::shape(title, x, y, self.layout.badge_width, self.layout.badge_height)
            .with_content(content)
            .with_style(ItemStyle::fill(color));
        self.canvas.create(spec).await.map_err(Into::into)
    }

    async fn create_version_frame(
        &self,
        name: &str,
        number: u32,
        x: f64,
        top: f64,
    ) -> Result<VersionState, SyncError> {
        let y = top + self.layout.version_height / 2.0;
        let frame = self
            .canvas
            .create(
                ItemSpec::frame(
                    discover::version_title(name, number),
                    x,
                    y,
                    self.layout.version_width,
                    self.layout.version_height,
                )
                .with_style(ItemStyle::fill(FRAME_FILL).with_border(FRAME_BORDER)),
            )
            .await?;
        let (header_x, header_y) =
            geometry::header_text_position(&self.layout, frame.x, frame.top());
        self.canvas
            .create(
                ItemSpec::text(format!("v{number}"), header_x, header_y, 96.0, 24.0)
                    .with_style(ItemStyle::default().with_font_size(18)),
            )
            .await?;
        Ok(VersionState {
            number,
            frame_id: frame.id,
            x: frame.x,
            y: frame.y,
        })
    }

    async fn create_overlay(&self, frame: &CanvasItem) -> Result<CanvasItem, SyncError> {
        let spec = ItemSpec::shape("Done", frame.x, frame.y, frame.width, frame.height)
            .with_content(tag::furniture("overlay"))
            .with_style(ItemStyle::fill(OVERLAY_FILL).with_opacity(OVERLAY_OPACITY));
        self.canvas.create(spec).await.map_err(Into::into)
    }

    fn remember_overlay(&self, project_id: &ProjectId, id: Option<ItemId>) {
        if let Some(row) = self.state.write().rows.get_mut(project_id) {
            row.done_overlay_id = id;
        }
    }
}
