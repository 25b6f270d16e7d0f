//! Tunable layout dimensions

use serde::{Deserialize, Serialize};

/// Dimensions and spacing for everything the engine draws
///
/// All coordinates produced from this config are center-based, matching the
/// whiteboard platform. Defaults target a full-size production board; tests
/// shrink `frame_height` to force growth paths early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Center x of a freshly created timeline frame
    pub origin_x: f64,
    /// Center y of a freshly created timeline frame
    pub origin_y: f64,
    /// Initial timeline frame height
    pub frame_height: f64,
    /// Inner padding between frame edge and content
    pub frame_padding: f64,
    /// Vertical space reserved above the drop zones for title and headers
    pub header_band: f64,
    /// Regular column width
    pub column_width: f64,
    /// Horizontal gap between columns
    pub column_gap: f64,
    /// Column header shape height
    pub column_header_height: f64,
    /// Card width
    pub card_width: f64,
    /// Card height
    pub card_height: f64,
    /// Vertical gap between stacked cards
    pub card_gap: f64,
    /// Horizontal gap between the timeline and the row area
    pub row_area_gap: f64,
    /// Briefing frame width
    pub briefing_width: f64,
    /// Briefing frame height
    pub briefing_height: f64,
    /// Header strip height inside briefing and version frames
    pub briefing_header: f64,
    /// Version frame width
    pub version_width: f64,
    /// Version frame height
    pub version_height: f64,
    /// Vertical gap between project rows
    pub row_gap: f64,
    /// Horizontal gap between version frames
    pub version_gap: f64,
    /// Badge shape width
    pub badge_width: f64,
    /// Badge shape height
    pub badge_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            frame_height: 1080.0,
            frame_padding: 48.0,
            header_band: 150.0,
            column_width: 320.0,
            column_gap: 24.0,
            column_header_height: 56.0,
            card_width: 280.0,
            card_height: 88.0,
            card_gap: 16.0,
            row_area_gap: 240.0,
            briefing_width: 640.0,
            briefing_height: 760.0,
            briefing_header: 64.0,
            version_width: 480.0,
            version_height: 560.0,
            row_gap: 120.0,
            version_gap: 48.0,
            badge_width: 132.0,
            badge_height: 36.0,
        }
    }
}

impl LayoutConfig {
    /// Config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the timeline frame at a different origin
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Override the initial timeline frame height
    #[inline]
    #[must_use]
    pub fn with_frame_height(mut self, height: f64) -> Self {
        self.frame_height = height;
        self
    }

    /// Vertical clearance kept free below the lowest card
    ///
    /// Growth triggers as soon as content would eat into this margin, so one
    /// more card always fits before the next resize.
    #[inline]
    #[must_use]
    pub fn safety_margin(&self) -> f64 {
        self.card_height + self.card_gap
    }
}
