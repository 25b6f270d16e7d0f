//! Easel Canvas - typed access to the shared whiteboard
//!
//! Models the board as a flat collection of [`CanvasItem`] snapshots and
//! exposes the [`RemoteCanvas`] trait the sync engine is written against:
//! - Center-based item geometry with edge accessors
//! - [`HttpCanvas`]: the production REST client
//! - Absence-tolerant reads: missing items are `None`, never an error
//!
//! # Example
//!
//! ```rust,ignore
//! use easel_canvas::{CanvasConfig, HttpCanvas, ItemKind, RemoteCanvas};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let canvas = HttpCanvas::new(CanvasConfig::new(
//!     "https://canvas.example.com/api/v2",
//!     "board-1",
//!     std::env::var("EASEL_CANVAS_TOKEN")?,
//! ));
//!
//! let frames = canvas.list_by_kind(ItemKind::Frame).await?;
//! println!("{} frames on the board", frames.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod http;
pub mod item;
pub mod remote;

// Re-exports for convenience
pub use error::CanvasError;
pub use http::{CanvasConfig, HttpCanvas};
pub use item::{CanvasItem, ItemId, ItemKind, ItemSpec, ItemStyle};
pub use remote::RemoteCanvas;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
