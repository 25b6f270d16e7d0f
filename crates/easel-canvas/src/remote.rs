//! Abstract canvas surface
//!
//! Everything the sync engine does to the whiteboard goes through
//! [`RemoteCanvas`]. Production code talks to the platform REST API via
//! [`HttpCanvas`](crate::HttpCanvas); tests substitute an in-memory board.
//!
//! The board is weakly consistent: between any two calls, other clients may
//! move, retitle, or delete items. Implementations report the board as it is
//! at call time and make no freshness promises beyond that.

use crate::error::CanvasError;
use crate::item::{CanvasItem, ItemId, ItemKind, ItemSpec};

/// Handle to a shared, externally-editable whiteboard
#[async_trait::async_trait]
pub trait RemoteCanvas: Send + Sync {
    /// List all items of one kind, in platform order
    async fn list_by_kind(&self, kind: ItemKind) -> Result<Vec<CanvasItem>, CanvasError>;

    /// Fetch a single item; `None` when the id no longer resolves
    ///
    /// Absence is an answer here, not an error. Stored identifiers go stale
    /// whenever a human deletes the item behind them.
    async fn get_by_id(&self, id: &ItemId) -> Result<Option<CanvasItem>, CanvasError>;

    /// Create an item and return the stored snapshot
    async fn create(&self, spec: ItemSpec) -> Result<CanvasItem, CanvasError>;

    /// Overwrite an item in place
    ///
    /// Fails with [`CanvasError::NotFound`] when the item was deleted since
    /// the snapshot was taken.
    async fn update(&self, item: &CanvasItem) -> Result<(), CanvasError>;

    /// Delete an item; deleting an already-gone item succeeds
    async fn remove(&self, id: &ItemId) -> Result<(), CanvasError>;

    /// Bring the given items into view for connected users
    async fn focus_on(&self, ids: &[ItemId]) -> Result<(), CanvasError>;
}
