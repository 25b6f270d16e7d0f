//! Typed snapshots of whiteboard items
//!
//! The whiteboard stores a flat collection of items (frames, shapes, texts,
//! app cards). Coordinates are center-based: `x`/`y` name the item's center,
//! so a frame that doubles in height keeps its center only if the caller
//! moves it. Edge accessors ([`CanvasItem::top`] and friends) derive the
//! bounding box from the center and extent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the whiteboard platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a platform identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Item families the engine works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Container frame (timeline, briefing, version work area)
    Frame,
    /// Plain shape (column header, separator, badge, overlay)
    Shape,
    /// Free-standing text
    Text,
    /// App card with due-date and theme metadata
    Card,
}

impl ItemKind {
    /// Query-string name used by the platform API
    #[inline]
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Shape => "shape",
            Self::Text => "text",
            Self::Card => "app_card",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Visual styling subset the engine reads and writes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Fill color as a hex string, e.g. `#2d9bf0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Border color as a hex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Opacity in `0.0..=1.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Font size in points, for text-bearing items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl ItemStyle {
    /// Style with only a fill color
    #[inline]
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill_color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Set the border color
    #[inline]
    #[must_use]
    pub fn with_border(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    /// Set the opacity
    #[inline]
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    /// Set the font size
    #[inline]
    #[must_use]
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }
}

/// Flat snapshot of a whiteboard item
///
/// Snapshots are read-your-own-writes only: another client (or a human
/// dragging items around) may have changed the board since this was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    /// Platform identifier
    pub id: ItemId,
    /// Item family
    pub kind: ItemKind,
    /// Visible title (frame titles double as the cold-recovery key)
    #[serde(default)]
    pub title: String,
    /// Body text; app cards carry their identity tag here
    #[serde(default)]
    pub content: String,
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Visual styling
    #[serde(default)]
    pub style: ItemStyle,
    /// Due date metadata (app cards only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_due: Option<NaiveDate>,
    /// Accent theme color (app cards only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_theme: Option<String>,
}

impl CanvasItem {
    /// Left edge
    #[inline]
    #[must_use]
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    /// Right edge
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Top edge
    #[inline]
    #[must_use]
    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    /// Bottom edge
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether a point falls inside this item's bounding box
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Whether another item's center lies inside this item's bounding box
    #[inline]
    #[must_use]
    pub fn contains_center_of(&self, other: &CanvasItem) -> bool {
        self.contains(other.x, other.y)
    }
}

/// Creation request for a new whiteboard item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Item family
    pub kind: ItemKind,
    /// Visible title
    #[serde(default)]
    pub title: String,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Visual styling
    #[serde(default)]
    pub style: ItemStyle,
    /// Due date metadata (app cards only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_due: Option<NaiveDate>,
    /// Accent theme color (app cards only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_theme: Option<String>,
}

impl ItemSpec {
    /// Spec for an untitled item of the given kind and placement
    #[inline]
    #[must_use]
    pub fn new(kind: ItemKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            title: String::new(),
            content: String::new(),
            x,
            y,
            width,
            height,
            style: ItemStyle::default(),
            card_due: None,
            card_theme: None,
        }
    }

    /// Spec for a frame
    #[inline]
    #[must_use]
    pub fn frame(title: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ItemKind::Frame, x, y, width, height).with_title(title)
    }

    /// Spec for a shape
    #[inline]
    #[must_use]
    pub fn shape(title: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ItemKind::Shape, x, y, width, height).with_title(title)
    }

    /// Spec for a text item
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ItemKind::Text, x, y, width, height).with_content(content)
    }

    /// Spec for an app card
    #[inline]
    #[must_use]
    pub fn card(title: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ItemKind::Card, x, y, width, height).with_title(title)
    }

    /// Set the title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body text
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the styling
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: ItemStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the due date metadata
    #[inline]
    #[must_use]
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.card_due = Some(due);
        self
    }

    /// Set the accent theme color
    #[inline]
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.card_theme = Some(theme.into());
        self
    }
}
