//! Testing utilities for the Easel workspace
//!
//! [`MemoryCanvas`] is an in-memory [`RemoteCanvas`] with the same observable
//! behavior as the production client: insertion-ordered listings, absence as
//! `None`, idempotent deletes. On top of that it simulates the humans a
//! shared board always has: helpers move, resize, retitle, and delete items
//! between engine calls, and one-shot faults stand in for a flaky network.
//!
//! Every trait method yields to the scheduler before touching state, so
//! concurrent tasks interleave the way they would over a real connection.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use easel_canvas::{CanvasError, CanvasItem, ItemId, ItemKind, ItemSpec, RemoteCanvas};
use parking_lot::Mutex;

/// Which operation the next injected fault should hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOp {
    List,
    Get,
    Create,
    Update,
    Remove,
}

#[derive(Default)]
struct Board {
    items: Vec<CanvasItem>,
    faults: Vec<FaultOp>,
    focus_history: Vec<Vec<ItemId>>,
}

/// In-memory board standing in for the canvas platform
#[derive(Default)]
pub struct MemoryCanvas {
    board: Mutex<Board>,
    created: AtomicU64,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&self, spec: ItemSpec) -> CanvasItem {
        let n = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        CanvasItem {
            id: ItemId::new(format!("{}-{n}", uuid::Uuid::new_v4())),
            kind: spec.kind,
            title: spec.title,
            content: spec.content,
            x: spec.x,
            y: spec.y,
            width: spec.width,
            height: spec.height,
            style: spec.style,
            card_due: spec.card_due,
            card_theme: spec.card_theme,
        }
    }

    fn take_fault(&self, op: FaultOp) -> Option<CanvasError> {
        let mut board = self.board.lock();
        let index = board.faults.iter().position(|f| *f == op)?;
        board.faults.remove(index);
        Some(CanvasError::Transport("injected fault".to_string()))
    }

    /// Queue a one-shot failure for the next call of `op`
    pub fn inject_fault(&self, op: FaultOp) {
        self.board.lock().faults.push(op);
    }

    /// Place an item directly, as if another client created it
    pub fn seed(&self, spec: ItemSpec) -> CanvasItem {
        let item = self.mint(spec);
        self.board.lock().items.push(item.clone());
        item
    }

    // External-edit helpers: what humans do to a shared board.

    pub fn move_item(&self, id: &ItemId, x: f64, y: f64) -> bool {
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.x = x;
                item.y = y;
                true
            }
            None => false,
        }
    }

    pub fn resize_item(&self, id: &ItemId, width: f64, height: f64) -> bool {
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.width = width;
                item.height = height;
                true
            }
            None => false,
        }
    }

    pub fn retitle_item(&self, id: &ItemId, title: &str) -> bool {
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_content(&self, id: &ItemId, content: &str) -> bool {
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.content = content.to_string();
                true
            }
            None => false,
        }
    }

    pub fn recolor_item(&self, id: &ItemId, fill: &str) -> bool {
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.style.fill_color = Some(fill.to_string());
                true
            }
            None => false,
        }
    }

    pub fn delete_item(&self, id: &ItemId) -> bool {
        let mut board = self.board.lock();
        let before = board.items.len();
        board.items.retain(|i| &i.id != id);
        board.items.len() < before
    }

    // Inspection.

    pub fn snapshot(&self) -> Vec<CanvasItem> {
        self.board.lock().items.clone()
    }

    pub fn items_of(&self, kind: ItemKind) -> Vec<CanvasItem> {
        self.board
            .lock()
            .items
            .iter()
            .filter(|i| i.kind == kind)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &ItemId) -> Option<CanvasItem> {
        self.board.lock().items.iter().find(|i| &i.id == id).cloned()
    }

    pub fn find_by_title(&self, title: &str) -> Option<CanvasItem> {
        self.board
            .lock()
            .items
            .iter()
            .find(|i| i.title == title)
            .cloned()
    }

    /// Total number of items ever created through this board
    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn focus_history(&self) -> Vec<Vec<ItemId>> {
        self.board.lock().focus_history.clone()
    }
}

#[async_trait]
impl RemoteCanvas for MemoryCanvas {
    async fn list_by_kind(&self, kind: ItemKind) -> Result<Vec<CanvasItem>, CanvasError> {
        tokio::task::yield_now().await;
        if let Some(err) = self.take_fault(FaultOp::List) {
            return Err(err);
        }
        Ok(self
            .board
            .lock()
            .items
            .iter()
            .filter(|i| i.kind == kind)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &ItemId) -> Result<Option<CanvasItem>, CanvasError> {
        tokio::task::yield_now().await;
        if let Some(err) = self.take_fault(FaultOp::Get) {
            return Err(err);
        }
        Ok(self.get(id))
    }

    async fn create(&self, spec: ItemSpec) -> Result<CanvasItem, CanvasError> {
        tokio::task::yield_now().await;
        if let Some(err) = self.take_fault(FaultOp::Create) {
            return Err(err);
        }
        let item = self.mint(spec);
        self.board.lock().items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: &CanvasItem) -> Result<(), CanvasError> {
        tokio::task::yield_now().await;
        if let Some(err) = self.take_fault(FaultOp::Update) {
            return Err(err);
        }
        let mut board = self.board.lock();
        match board.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(())
            }
            None => Err(CanvasError::NotFound(item.id.clone())),
        }
    }

    async fn remove(&self, id: &ItemId) -> Result<(), CanvasError> {
        tokio::task::yield_now().await;
        if let Some(err) = self.take_fault(FaultOp::Remove) {
            return Err(err);
        }
        self.board.lock().items.retain(|i| &i.id != id);
        Ok(())
    }

    async fn focus_on(&self, ids: &[ItemId]) -> Result<(), CanvasError> {
        tokio::task::yield_now().await;
        self.board.lock().focus_history.push(ids.to_vec());
        Ok(())
    }
}
