//! Timeline frame, column, and card geometry
//!
//! Every function here is pure arithmetic over a [`LayoutConfig`] and plain
//! coordinates. The one rule that shapes this whole module: a timeline frame
//! is anchored by its TOP edge. Growth changes height and therefore center,
//! never the anchor, so `center_for_top(anchor, new_height)` is the only
//! legal way to compute a grown frame's y.

use crate::config::LayoutConfig;

/// Top edge of a center-positioned item
#[inline]
#[must_use]
pub fn top_from_center(center_y: f64, height: f64) -> f64 {
    center_y - height / 2.0
}

/// Center y that keeps `top` fixed for the given height
#[inline]
#[must_use]
pub fn center_for_top(top: f64, height: f64) -> f64 {
    top + height / 2.0
}

/// Full timeline frame width for `column_count` regular columns
///
/// The double-width auxiliary lane rides at the right edge and is included
/// here, as is one gap per column boundary.
#[must_use]
pub fn frame_width(cfg: &LayoutConfig, column_count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = column_count as f64;
    2.0 * cfg.frame_padding + n * cfg.column_width + 2.0 * cfg.column_width + n * cfg.column_gap
}

/// Center x of regular column `index`
#[must_use]
pub fn column_x(cfg: &LayoutConfig, frame_left: f64, index: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let i = index as f64;
    frame_left + cfg.frame_padding + i * (cfg.column_width + cfg.column_gap) + cfg.column_width / 2.0
}

/// Center x of the auxiliary lane, anchored to the frame's RIGHT edge
///
/// Right-anchored on purpose: if a user widens the frame, the lane keeps
/// hugging the edge instead of drifting into the regular columns.
#[inline]
#[must_use]
pub fn aux_column_x(cfg: &LayoutConfig, frame_right: f64) -> f64 {
    frame_right - cfg.frame_padding - cfg.column_width
}

/// Width of the auxiliary lane
#[inline]
#[must_use]
pub fn aux_column_width(cfg: &LayoutConfig) -> f64 {
    2.0 * cfg.column_width
}

/// Top edge of every column's drop zone
#[inline]
#[must_use]
pub fn zone_top(cfg: &LayoutConfig, top_anchor: f64) -> f64 {
    top_anchor + cfg.header_band
}

/// Center y of the column header shapes, directly above the drop zones
#[inline]
#[must_use]
pub fn column_header_y(cfg: &LayoutConfig, top_anchor: f64) -> f64 {
    zone_top(cfg, top_anchor) - cfg.column_header_height / 2.0
}

/// Center of the board title text
#[inline]
#[must_use]
pub fn title_position(cfg: &LayoutConfig, frame_center_x: f64, top_anchor: f64) -> (f64, f64) {
    (frame_center_x, top_anchor + cfg.frame_padding * 0.75)
}

/// Center of the "externally editable" warning text, below the title
#[inline]
#[must_use]
pub fn warning_position(cfg: &LayoutConfig, frame_center_x: f64, top_anchor: f64) -> (f64, f64) {
    (frame_center_x, top_anchor + cfg.frame_padding * 1.5)
}

/// Center y for the first card in an empty column
#[inline]
#[must_use]
pub fn first_card_y(cfg: &LayoutConfig, zone_top: f64) -> f64 {
    zone_top + cfg.card_gap + cfg.card_height / 2.0
}

/// Center y for a card stacked below the current lowest card
#[inline]
#[must_use]
pub fn next_card_y(cfg: &LayoutConfig, lowest_bottom: f64) -> f64 {
    lowest_bottom + cfg.card_gap + cfg.card_height / 2.0
}

/// Whether a card center x falls inside a column's horizontal band
#[inline]
#[must_use]
pub fn in_column_band(column_x: f64, column_width: f64, x: f64) -> bool {
    (x - column_x).abs() <= column_width / 2.0
}

/// Whether content reaching `content_bottom` forces the frame to grow
#[inline]
#[must_use]
pub fn needs_growth(cfg: &LayoutConfig, frame_bottom: f64, content_bottom: f64) -> bool {
    content_bottom > frame_bottom - cfg.safety_margin()
}

/// Frame height needed to hold content reaching `content_bottom`
#[inline]
#[must_use]
pub fn required_height(cfg: &LayoutConfig, top_anchor: f64, content_bottom: f64) -> f64 {
    content_bottom + cfg.safety_margin() + cfg.frame_padding - top_anchor
}

/// New frame height after a growth step
///
/// Tripling dominates until content is deep enough that the required height
/// wins; either way each step is large enough that resizes stay rare.
#[inline]
#[must_use]
pub fn grown_height(current: f64, required: f64) -> f64 {
    f64::max(3.0 * current, required)
}

/// Center x of the separator at column `boundary` (1-based, aux boundary last)
#[must_use]
pub fn separator_x(cfg: &LayoutConfig, frame_left: f64, boundary: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let b = boundary as f64;
    frame_left + cfg.frame_padding + b * (cfg.column_width + cfg.column_gap) - cfg.column_gap / 2.0
}

/// Separator center y and height for the current frame extent
#[must_use]
pub fn separator_span(cfg: &LayoutConfig, top_anchor: f64, frame_bottom: f64) -> (f64, f64) {
    let top = zone_top(cfg, top_anchor);
    let bottom = frame_bottom - cfg.frame_padding;
    ((top + bottom) / 2.0, bottom - top)
}
