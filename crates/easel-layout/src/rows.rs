//! Project row geometry: briefing frames, badges, field grids, versions
//!
//! Rows live to the right of the timeline and stack downward. Placement
//! always measures the ACTUAL extents of existing items rather than assuming
//! configured sizes, since users resize briefing and version frames freely.

use crate::config::LayoutConfig;

/// One labelled cell: a small label text above or beside a value box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Label text center x
    pub label_x: f64,
    /// Label text center y
    pub label_y: f64,
    /// Value box center x
    pub x: f64,
    /// Value box center y
    pub y: f64,
    /// Value box width
    pub width: f64,
    /// Value box height
    pub height: f64,
}

/// Left edge of the row area, to the right of the timeline
#[inline]
#[must_use]
pub fn row_area_left(cfg: &LayoutConfig, timeline_right: f64) -> f64 {
    timeline_right + cfg.row_area_gap
}

/// Briefing frame center x inside the row area
#[inline]
#[must_use]
pub fn briefing_x(cfg: &LayoutConfig, area_left: f64) -> f64 {
    area_left + cfg.briefing_width / 2.0
}

/// Center y of the first row, top-aligned with the timeline frame
#[inline]
#[must_use]
pub fn first_row_y(cfg: &LayoutConfig, timeline_top: f64) -> f64 {
    timeline_top + cfg.briefing_height / 2.0
}

/// Center y of a row placed below the lowest existing briefing frame
#[inline]
#[must_use]
pub fn next_row_y(cfg: &LayoutConfig, lowest_bottom: f64) -> f64 {
    lowest_bottom + cfg.row_gap + cfg.briefing_height / 2.0
}

/// Center x of the first version frame, beside the briefing frame
#[inline]
#[must_use]
pub fn first_version_x(cfg: &LayoutConfig, briefing_right: f64) -> f64 {
    briefing_right + cfg.version_gap + cfg.version_width / 2.0
}

/// Center x of a version frame placed after an existing one
///
/// `prev_right` is the actual right edge of the predecessor, so a frame the
/// user stretched pushes its successor further out instead of overlapping.
#[inline]
#[must_use]
pub fn next_version_x(cfg: &LayoutConfig, prev_right: f64) -> f64 {
    prev_right + cfg.version_gap + cfg.version_width / 2.0
}

/// Header text center inside a briefing or version frame
#[inline]
#[must_use]
pub fn header_text_position(cfg: &LayoutConfig, frame_center_x: f64, frame_top: f64) -> (f64, f64) {
    (frame_center_x, frame_top + cfg.briefing_header / 2.0)
}

/// Center y of the badge row, directly under the briefing header
#[inline]
#[must_use]
pub fn badge_row_y(cfg: &LayoutConfig, frame_top: f64) -> f64 {
    frame_top + cfg.briefing_header + cfg.badge_height / 2.0 + 8.0
}

/// Center x of badge `slot` (0-based, left to right)
#[must_use]
pub fn badge_x(cfg: &LayoutConfig, frame_left: f64, slot: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let s = slot as f64;
    frame_left + 32.0 + s * (cfg.badge_width + 16.0) + cfg.badge_width / 2.0
}

/// Cells for the six briefing fields, in a two-column grid
#[must_use]
pub fn field_cells(cfg: &LayoutConfig, frame_left: f64, frame_top: f64) -> Vec<GridCell> {
    let inner = 32.0;
    let cell_width = (cfg.briefing_width - 3.0 * inner) / 2.0;
    let label_height = 20.0;
    let value_height = 72.0;
    let pitch = label_height + value_height + 18.0;
    let grid_top = badge_row_y(cfg, frame_top) + cfg.badge_height / 2.0 + 24.0;

    (0..6)
        .map(|slot| {
            #[allow(clippy::cast_precision_loss)]
            let (col, row) = ((slot % 2) as f64, (slot / 2) as f64);
            let x = frame_left + inner + col * (cell_width + inner) + cell_width / 2.0;
            let label_y = grid_top + row * pitch + label_height / 2.0;
            let y = grid_top + row * pitch + label_height + value_height / 2.0;
            GridCell {
                label_x: x,
                label_y,
                x,
                y,
                width: cell_width,
                height: value_height,
            }
        })
        .collect()
}

/// The two collection sections at the briefing frame's bottom edge
#[must_use]
pub fn section_cells(cfg: &LayoutConfig, frame_left: f64, frame_bottom: f64) -> [GridCell; 2] {
    let inner = 32.0;
    let width = (cfg.briefing_width - 3.0 * inner) / 2.0;
    let height = 140.0;
    let y = frame_bottom - inner - height / 2.0;
    let label_y = y - height / 2.0 - 12.0;
    let cell = |col: f64| GridCell {
        label_x: frame_left + inner + col * (width + inner) + width / 2.0,
        label_y,
        x: frame_left + inner + col * (width + inner) + width / 2.0,
        y,
        width,
        height,
    };
    [cell(0.0), cell(1.0)]
}
