//! Duplicate card cleanup
//!
//! Weak consistency means duplicates happen: two engine instances race past
//! each other's listings, or a human copies a card by hand. The sweep keeps
//! the first card the platform lists for each project, removes the rest
//! concurrently, and repairs card memory from the survivors.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use easel_canvas::{CanvasItem, ItemKind};

use crate::discover;
use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::project::{DueDate, ProjectId, ProjectStatus};
use crate::state::{CardId, TimelineCard};
use crate::timeline::parse_card_title;

/// Split tagged cards into the first-listed survivor per project and the rest
///
/// Platform listing order is stable enough that repeated sweeps pick the
/// same survivor; untagged cards belong to humans and are never touched.
fn partition_duplicates(
    cards: &[CanvasItem],
) -> (HashMap<ProjectId, &CanvasItem>, Vec<&CanvasItem>) {
    let mut survivors: HashMap<ProjectId, &CanvasItem> = HashMap::new();
    let mut doomed = Vec::new();
    for card in cards {
        let Some(id) = discover::card_identity(card) else {
            continue;
        };
        match survivors.entry(id) {
            Entry::Occupied(_) => doomed.push(card),
            Entry::Vacant(slot) => {
                slot.insert(card);
            }
        }
    }
    (survivors, doomed)
}

impl SyncEngine {
    /// Remove all but one card per project and repair card memory
    ///
    /// Returns how many cards were removed. Memory self-heals along the way:
    /// cards whose project no longer has a survivor are forgotten, known
    /// survivors get their position refreshed, and survivors the engine has
    /// never seen (made by another instance, say) are adopted from what the
    /// card itself shows.
    pub async fn cleanup_duplicates(&self) -> Result<usize, SyncError> {
        let _pass = self.gate.acquire().await;
        let mut timeline = self.timeline_snapshot()?;

        let cards = self.canvas.list_by_kind(ItemKind::Card).await?;
        let (survivors, doomed) = partition_duplicates(&cards);

        let removed = doomed.len();
        futures::future::try_join_all(doomed.iter().map(|card| self.canvas.remove(&card.id)))
            .await?;

        timeline
            .cards
            .retain(|c| survivors.contains_key(&c.project_id));
        for (project_id, item) in &survivors {
            match timeline.card_for_mut(project_id) {
                Some(card) => {
                    card.remote_id = Some(item.id.clone());
                    card.x = item.x;
                    card.y = item.y;
                }
                None => {
                    let (name, client) = parse_card_title(&item.title);
                    let status = timeline
                        .column_at(item.x)
                        .map_or(ProjectStatus::Todo, |c| c.status);
                    timeline.cards.push(TimelineCard {
                        id: CardId::generate(),
                        project_id: project_id.clone(),
                        project_name: name,
                        client_name: client,
                        due: item.card_due.map(DueDate::DateOnly),
                        status,
                        remote_id: Some(item.id.clone()),
                        x: item.x,
                        y: item.y,
                    });
                }
            }
        }
        self.state.write().timeline = Some(timeline);

        if removed > 0 {
            tracing::info!(removed, "duplicate cards swept");
        }
        Ok(removed)
    }
}
