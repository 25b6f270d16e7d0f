//! Timeline operations: initialization, card sync, growth
//!
//! The timeline is a single Kanban frame with one column per status and a
//! cosmetic parking lane on the right. Three rules shape everything here:
//! - One card per project, correlated by identity tag, never by position.
//! - A card already inside its column's band keeps its exact position; the
//!   engine must not fight humans over placement.
//! - The frame grows downward from a fixed top anchor and never shrinks.

use chrono::Utc;
use easel_canvas::{CanvasItem, ItemKind, ItemSpec, ItemStyle};
use easel_layout::timeline as geometry;
use easel_layout::LayoutConfig;

use crate::discover;
use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::project::{Project, ProjectId, ProjectStatus, SyncOptions};
use crate::state::{CardId, TimelineCard, TimelineColumn, TimelineState};
use crate::tag;

const WARNING_TEXT: &str =
    "Shared board: anyone can move or edit items. Positions are adopted, not enforced.";
const AUX_LABEL: &str = "Parking Lot";
pub(crate) const NEUTRAL_COLOR: &str = "#b0b6bf";
const SEPARATOR_COLOR: &str = "#d8dde3";
pub(crate) const FRAME_FILL: &str = "#ffffff";
pub(crate) const FRAME_BORDER: &str = "#c3cad2";
const REVIEW_MARK: &str = "\u{2713} ";

const COLUMN_COUNT: usize = ProjectStatus::COLUMN_ORDER.len();

/// What a sync writes onto the remote card
struct CardRender {
    title: String,
    content: String,
    theme: String,
    due: Option<chrono::NaiveDate>,
}

fn render_card(project: &Project, effective: ProjectStatus, options: SyncOptions) -> CardRender {
    let reviewed = project.was_reviewed || options.mark_as_reviewed;
    let mark = if reviewed { REVIEW_MARK } else { "" };
    let title = match &project.client_name {
        Some(client) => format!("{mark}{} ({client})", project.name),
        None => format!("{mark}{}", project.name),
    };
    let theme = if project.is_archived() {
        NEUTRAL_COLOR.to_string()
    } else {
        effective.color().to_string()
    };
    CardRender {
        title,
        content: tag::embed(&project.id),
        theme,
        due: project.due.as_ref().map(|d| d.date()),
    }
}

/// Inverse of the card title rendering, for adopting foreign-made cards
pub(crate) fn parse_card_title(title: &str) -> (String, String) {
    let trimmed = title.trim().trim_start_matches('\u{2713}').trim_start();
    match trimmed.rsplit_once(" (") {
        Some((name, rest)) if rest.ends_with(')') => (
            name.to_string(),
            rest.trim_end_matches(')').to_string(),
        ),
        _ => (trimmed.to_string(), String::new()),
    }
}

fn build_columns(layout: &LayoutConfig, frame_left: f64, top_anchor: f64) -> Vec<TimelineColumn> {
    let zone = geometry::zone_top(layout, top_anchor);
    ProjectStatus::COLUMN_ORDER
        .iter()
        .enumerate()
        .map(|(index, status)| TimelineColumn {
            status: *status,
            label: status.label().to_string(),
            color: status.color().to_string(),
            x: geometry::column_x(layout, frame_left, index),
            y: zone,
            width: layout.column_width,
        })
        .collect()
}

impl SyncEngine {
    /// Create the timeline on the board, or adopt one that already exists
    ///
    /// Idempotent. A warm engine only re-validates the parking lane; a cold
    /// one discovers an existing frame by title and rebuilds geometry from
    /// the frame's ACTUAL dimensions, so a user-resized frame is adopted
    /// as-is rather than snapped back.
    pub async fn initialize_timeline(&self) -> Result<TimelineState, SyncError> {
        let _pass = self.gate.acquire().await;

        // 1. warm path: trust memory, re-check only the cosmetic lane
        let cached = self.state.read().timeline.clone();
        if let Some(state) = cached {
            self.ensure_aux_lane(&state).await?;
            return Ok(state);
        }

        // 2. cold path: the board may already carry a timeline
        let frames = self.canvas.list_by_kind(ItemKind::Frame).await?;
        let state = match discover::find_timeline_frame(&frames) {
            Some(frame) => self.adopt_timeline(frame).await?,
            None => self.create_timeline().await?,
        };

        self.state.write().timeline = Some(state.clone());
        tracing::info!(
            frame = %state.frame_id,
            anchor = state.top_anchor,
            height = state.frame_height,
            "timeline ready"
        );
        Ok(state)
    }

    async fn adopt_timeline(&self, frame: &CanvasItem) -> Result<TimelineState, SyncError> {
        let top_anchor = frame.top();
        let state = TimelineState {
            frame_id: frame.id.clone(),
            frame_center_x: frame.x,
            top_anchor,
            frame_width: frame.width,
            frame_height: frame.height,
            columns: build_columns(&self.layout, frame.left(), top_anchor),
            cards: Vec::new(),
            last_sync_at: Utc::now(),
        };
        self.ensure_aux_lane(&state).await?;
        tracing::debug!(frame = %frame.id, "adopted existing timeline frame");
        Ok(state)
    }

    async fn create_timeline(&self) -> Result<TimelineState, SyncError> {
        let layout = &self.layout;
        let width = geometry::frame_width(layout, COLUMN_COUNT);

        // 1. the frame itself, centered on the configured origin
        let frame = self
            .canvas
            .create(
                ItemSpec::frame(
                    discover::TIMELINE_TITLE,
                    layout.origin_x,
                    layout.origin_y,
                    width,
                    layout.frame_height,
                )
                .with_style(ItemStyle::fill(FRAME_FILL).with_border(FRAME_BORDER)),
            )
            .await?;
        let top_anchor = frame.top();
        let left = frame.left();

        // 2. title and shared-editing notice
        let (tx, ty) = geometry::title_position(layout, frame.x, top_anchor);
        self.canvas
            .create(
                ItemSpec::text(discover::TIMELINE_TITLE, tx, ty, width * 0.4, 40.0)
                    .with_style(ItemStyle::default().with_font_size(28)),
            )
            .await?;
        let (wx, wy) = geometry::warning_position(layout, frame.x, top_anchor);
        self.canvas
            .create(
                ItemSpec::text(WARNING_TEXT, wx, wy, width * 0.6, 24.0)
                    .with_style(ItemStyle::default().with_font_size(12)),
            )
            .await?;

        // 3. column headers
        let columns = build_columns(layout, left, top_anchor);
        let header_y = geometry::column_header_y(layout, top_anchor);
        for column in &columns {
            self.canvas
                .create(
                    ItemSpec::shape(
                        column.label.clone(),
                        column.x,
                        header_y,
                        layout.column_width - 8.0,
                        layout.column_header_height,
                    )
                    .with_content(tag::furniture(&format!("column:{}", column.status.slug())))
                    .with_style(ItemStyle::fill(column.color.clone())),
                )
                .await?;
        }

        // 4. separators, one per column boundary
        let frame_bottom = top_anchor + layout.frame_height;
        let (sep_y, sep_h) = geometry::separator_span(layout, top_anchor, frame_bottom);
        for boundary in 1..=COLUMN_COUNT {
            self.canvas
                .create(
                    ItemSpec::shape(
                        String::new(),
                        geometry::separator_x(layout, left, boundary),
                        sep_y,
                        2.0,
                        sep_h,
                    )
                    .with_content(tag::furniture(&format!("separator:{boundary}")))
                    .with_style(ItemStyle::fill(SEPARATOR_COLOR)),
                )
                .await?;
        }

        // 5. the parking lane header
        self.create_aux_header(frame.right(), top_anchor).await?;

        // 6. bring the fresh board into view; cosmetic, never fatal
        if let Err(err) = self.canvas.focus_on(std::slice::from_ref(&frame.id)).await {
            tracing::warn!(error = %err, "viewport focus failed");
        }

        Ok(TimelineState {
            frame_id: frame.id.clone(),
            frame_center_x: frame.x,
            top_anchor,
            frame_width: width,
            frame_height: layout.frame_height,
            columns,
            cards: Vec::new(),
            last_sync_at: Utc::now(),
        })
    }

    async fn create_aux_header(
        &self,
        frame_right: f64,
        top_anchor: f64,
    ) -> Result<CanvasItem, SyncError> {
        let layout = &self.layout;
        let item = self
            .canvas
            .create(
                ItemSpec::shape(
                    AUX_LABEL,
                    geometry::aux_column_x(layout, frame_right),
                    geometry::column_header_y(layout, top_anchor),
                    geometry::aux_column_width(layout) - 8.0,
                    layout.column_header_height,
                )
                .with_content(tag::furniture("aux"))
                .with_style(ItemStyle::fill(NEUTRAL_COLOR)),
            )
            .await?;
        Ok(item)
    }

    /// Recreate the parking lane header if an external edit removed it
    async fn ensure_aux_lane(&self, state: &TimelineState) -> Result<(), SyncError> {
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let present = shapes
            .iter()
            .any(|s| tag::is_furniture(&s.content, "aux") || s.title == AUX_LABEL);
        if !present {
            tracing::info!("parking lane header missing, recreating");
            self.create_aux_header(state.right(), state.top_anchor)
                .await?;
        }
        Ok(())
    }

    /// Mirror one project onto the timeline
    ///
    /// # Workflow
    /// 1. Refuse before initialization
    /// 2. Claim the per-project slot; duplicates answer from memory
    /// 3. Wait for the FIFO gate
    /// 4. Derive the effective status and its column
    /// 5. Discover the card on the live board, reconcile memory
    /// 6. Place: keep an in-band position, restack an out-of-band one
    /// 7. Grow the frame if the card would land inside the safety margin
    /// 8. Update the card in place, or create it after a final re-check
    /// 9. Commit memory
    /// 10. Cosmetic follow-ups (badges, overlay, colors, legacy cleanup)
    pub async fn sync_project(
        &self,
        project: &Project,
        options: SyncOptions,
    ) -> Result<TimelineCard, SyncError> {
        // 1. nothing works before the timeline exists
        if self.state.read().timeline.is_none() {
            return Err(SyncError::NotInitialized);
        }

        // 2. duplicate requests must not queue behind the running sync
        let Some(_claim) = self.in_flight.begin(&project.id) else {
            tracing::debug!(project = %project.id, "sync already in flight");
            let cached = self
                .state
                .read()
                .timeline
                .as_ref()
                .and_then(|t| t.card_for(&project.id).cloned());
            return match cached {
                Some(card) => Ok(card),
                None => Err(SyncError::SyncInProgress(project.id.clone())),
            };
        };

        // 3. one layout mutation at a time, in arrival order
        let _pass = self.gate.acquire().await;

        let mut timeline = self.timeline_snapshot()?;
        let now = Utc::now();

        // 4. the column this project belongs in right now
        let effective = project.effective_status(now);
        let column = timeline
            .column(effective)
            .cloned()
            .ok_or(SyncError::ColumnNotFound(effective))?;

        // 5. the board outranks memory
        let remote_cards = self.canvas.list_by_kind(ItemKind::Card).await?;
        let remote = discover::find_card(&remote_cards, &project.id).cloned();
        reconcile_card_memory(&mut timeline, &remote_cards);

        // 6. placement
        let target_x = column.x;
        let target_y = match &remote {
            Some(item) if column.band_contains(item.x) => item.y,
            _ => stacked_card_y(&self.layout, &column, &remote_cards, &project.id),
        };

        // 7. growth check, using actual card extents plus the candidate
        let candidate_bottom = target_y + self.layout.card_height / 2.0;
        let content_bottom = remote_cards
            .iter()
            .filter(|c| discover::card_identity(c).is_some_and(|id| id != project.id))
            .map(CanvasItem::bottom)
            .fold(candidate_bottom, f64::max);
        if geometry::needs_growth(&self.layout, timeline.bottom(), content_bottom) {
            self.grow_frame(&mut timeline, content_bottom).await?;
        }

        // 8. write through
        let rendered = render_card(project, effective, options);
        let remote_item = match remote {
            Some(item) => self.write_card(item, &rendered, target_x, target_y).await?,
            None => {
                // the listing above is already stale; check once more right
                // before creating, so a card made in the gap wins
                let recheck = self.canvas.list_by_kind(ItemKind::Card).await?;
                match discover::find_card(&recheck, &project.id).cloned() {
                    Some(item) => self.write_card(item, &rendered, target_x, target_y).await?,
                    None => {
                        let mut spec = ItemSpec::card(
                            rendered.title.clone(),
                            target_x,
                            target_y,
                            self.layout.card_width,
                            self.layout.card_height,
                        )
                        .with_content(rendered.content.clone())
                        .with_theme(rendered.theme.clone());
                        if let Some(due) = rendered.due {
                            spec = spec.with_due(due);
                        }
                        self.canvas.create(spec).await?
                    }
                }
            }
        };

        // 9. commit memory
        let card = TimelineCard {
            id: timeline
                .card_for(&project.id)
                .map_or_else(CardId::generate, |c| c.id),
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            client_name: project.client_label().to_string(),
            due: project.due,
            status: effective,
            remote_id: Some(remote_item.id.clone()),
            x: remote_item.x,
            y: remote_item.y,
        };
        timeline.upsert_card(card.clone());
        timeline.last_sync_at = now;
        self.state.write().timeline = Some(timeline);

        // 10. cosmetic follow-ups; failures are logged and swallowed
        if let Err(err) = self
            .update_briefing_status(&project.id, effective, &project.name)
            .await
        {
            tracing::warn!(project = %project.id, error = %err, "status badge update failed");
        }
        if let Err(err) = self
            .update_briefing_due_date(
                &project.id,
                project.due.as_ref(),
                project.due_approved,
                &project.name,
            )
            .await
        {
            tracing::warn!(project = %project.id, error = %err, "due badge update failed");
        }
        if let Err(err) = self
            .handle_done_overlay_locked(&project.id, &project.name, effective.is_terminal())
            .await
        {
            tracing::warn!(project = %project.id, error = %err, "done overlay update failed");
        }
        if let Err(err) = self.refresh_column_colors().await {
            tracing::warn!(error = %err, "column color refresh failed");
        }
        if let Err(err) = self.scrub_legacy_titles(&remote_cards, &project.id).await {
            tracing::warn!(error = %err, "legacy title cleanup failed");
        }

        tracing::info!(project = %project.id, status = %effective, x = card.x, y = card.y, "project synced");
        Ok(card)
    }

    async fn write_card(
        &self,
        mut item: CanvasItem,
        rendered: &CardRender,
        x: f64,
        y: f64,
    ) -> Result<CanvasItem, SyncError> {
        item.title = rendered.title.clone();
        item.content = rendered.content.clone();
        item.card_theme = Some(rendered.theme.clone());
        item.card_due = rendered.due;
        item.x = x;
        item.y = y;
        self.canvas.update(&item).await?;
        Ok(item)
    }

    /// Grow the frame downward, keeping the top anchor fixed
    async fn grow_frame(
        &self,
        timeline: &mut TimelineState,
        content_bottom: f64,
    ) -> Result<(), SyncError> {
        let required = geometry::required_height(&self.layout, timeline.top_anchor, content_bottom);
        let new_height = geometry::grown_height(timeline.frame_height, required);

        let mut frame = self
            .canvas
            .get_by_id(&timeline.frame_id)
            .await?
            .ok_or_else(|| SyncError::ItemVanished(timeline.frame_id.clone()))?;
        frame.height = new_height;
        // the anchor is the stored one, never re-derived from the center
        frame.y = geometry::center_for_top(timeline.top_anchor, new_height);
        self.canvas.update(&frame).await?;
        timeline.frame_height = new_height;

        if let Err(err) = self.restretch_separators(timeline).await {
            tracing::warn!(error = %err, "separator restretch failed");
        }
        tracing::info!(height = new_height, bottom = timeline.bottom(), "timeline frame grown");
        Ok(())
    }

    async fn restretch_separators(&self, timeline: &TimelineState) -> Result<(), SyncError> {
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let (sep_y, sep_h) =
            geometry::separator_span(&self.layout, timeline.top_anchor, timeline.bottom());
        for separator in discover::furniture_items(&shapes, "separator") {
            let mut fresh = separator.clone();
            fresh.y = sep_y;
            fresh.height = sep_h;
            self.canvas.update(&fresh).await?;
        }
        Ok(())
    }

    /// Restore canonical header colors after external recoloring
    pub(crate) async fn refresh_column_colors(&self) -> Result<usize, SyncError> {
        let timeline = self.timeline_snapshot()?;
        let shapes = self.canvas.list_by_kind(ItemKind::Shape).await?;
        let mut fixed = 0;
        for column in &timeline.columns {
            let marker = tag::furniture(&format!("column:{}", column.status.slug()));
            let Some(header) = shapes.iter().find(|s| s.content.contains(&marker)) else {
                continue;
            };
            if header.style.fill_color.as_deref() != Some(column.color.as_str()) {
                let mut fresh = header.clone();
                fresh.style.fill_color = Some(column.color.clone());
                self.canvas.update(&fresh).await?;
                fixed += 1;
            }
        }
        if fixed > 0 {
            tracing::debug!(fixed, "column header colors restored");
        }
        Ok(fixed)
    }

    /// Move tags out of visible titles on cards made by old releases
    async fn scrub_legacy_titles(
        &self,
        cards: &[CanvasItem],
        skip: &ProjectId,
    ) -> Result<usize, SyncError> {
        let mut cleaned = 0;
        for card in cards {
            let Some(id) = tag::extract(&card.title) else {
                continue;
            };
            if &id == skip {
                // the running sync already rewrote this card
                continue;
            }
            let mut fresh = card.clone();
            fresh.title = tag::strip(&card.title);
            if !tag::matches(&fresh.content, &id) {
                fresh.content = if fresh.content.is_empty() {
                    tag::embed(&id)
                } else {
                    format!("{}\n{}", fresh.content, tag::embed(&id))
                };
            }
            self.canvas.update(&fresh).await?;
            cleaned += 1;
        }
        if cleaned > 0 {
            tracing::debug!(cleaned, "legacy card titles scrubbed");
        }
        Ok(cleaned)
    }

    /// Remove a project from the board: its card and its whole briefing row
    ///
    /// Absence is tolerated throughout; removing a project that was never
    /// mirrored is a no-op.
    pub async fn remove_project(&self, project_id: &ProjectId) -> Result<(), SyncError> {
        let _pass = self.gate.acquire().await;
        let mut timeline = self.timeline_snapshot()?;

        // 1. the card, discovered by tag; its title doubles as a name hint
        //    for finding the row when this engine never built it
        let cards = self.canvas.list_by_kind(ItemKind::Card).await?;
        let mut name_hint = None;
        if let Some(card) = discover::find_card(&cards, project_id) {
            name_hint = Some(parse_card_title(&card.title).0);
            self.canvas.remove(&card.id).await?;
            tracing::info!(project = %project_id, "card removed");
        }
        if name_hint.is_none() {
            name_hint = timeline.card_for(project_id).map(|c| c.project_name.clone());
        }
        timeline.remove_card(project_id);
        timeline.last_sync_at = Utc::now();
        self.state.write().timeline = Some(timeline);

        // 2. the briefing row and its version trail
        self.remove_project_row_locked(project_id, name_hint.as_deref())
            .await?;
        Ok(())
    }
}

/// Purge memory entries with no surviving remote card, refresh the rest
fn reconcile_card_memory(timeline: &mut TimelineState, remote: &[CanvasItem]) {
    timeline
        .cards
        .retain(|card| remote.iter().any(|item| {
            discover::card_identity(item).is_some_and(|id| id == card.project_id)
        }));
    for item in remote {
        let Some(id) = discover::card_identity(item) else {
            continue;
        };
        if let Some(known) = timeline.card_for_mut(&id) {
            known.remote_id = Some(item.id.clone());
            known.x = item.x;
            known.y = item.y;
        }
    }
}

/// Stack position below the lowest tagged card already in the column band
fn stacked_card_y(
    layout: &LayoutConfig,
    column: &TimelineColumn,
    cards: &[CanvasItem],
    skip: &ProjectId,
) -> f64 {
    let lowest = cards
        .iter()
        .filter(|c| discover::card_identity(c).is_some_and(|id| &id != skip))
        .filter(|c| column.band_contains(c.x))
        .map(CanvasItem::bottom)
        .reduce(f64::max);
    match lowest {
        Some(bottom) => geometry::next_card_y(layout, bottom),
        None => geometry::first_card_y(layout, column.y),
    }
}
