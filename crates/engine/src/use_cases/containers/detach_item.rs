//! Detach item use case.
//!
//! Lifts an item out of its container to top level. This is also the
//! declined half of a cross-actor drag: the core never moves an item
//! directly into another actor's container, so the caller detaches it here
//! and re-drops it top-level on the receiving side.

use std::sync::Arc;

use packbldr_domain::{ActorId, ContainerForest, ItemId};

use crate::infrastructure::ports::ItemRepo;

use super::error::ContainerError;
use super::types::DetachItemResult;

/// Detach item use case.
///
/// A top-level drop cannot nest containers, so there is no notification
/// collaborator here. Idempotent: detaching an already top-level item is a
/// tolerated no-op.
pub struct DetachItem {
    item_repo: Arc<dyn ItemRepo>,
}

impl DetachItem {
    pub fn new(item_repo: Arc<dyn ItemRepo>) -> Self {
        Self { item_repo }
    }

    pub async fn execute(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<DetachItemResult, ContainerError> {
        let items = self.item_repo.list_for_actor(actor_id).await?;
        let mut forest = ContainerForest::from_items(actor_id, items)?;

        let outcome = forest.move_item(item_id, None)?;

        for id in &outcome.touched {
            if let Some(item) = forest.get(*id) {
                self.item_repo.save(item).await?;
            }
        }

        let item_name = forest
            .get(item_id)
            .map(|item| item.name.to_string())
            .unwrap_or_default();

        tracing::info!(
            actor_id = %actor_id,
            item_id = %item_id,
            changed = outcome.changed,
            "Item detached to top level"
        );

        Ok(DetachItemResult {
            item_name,
            changed: outcome.changed,
        })
    }
}
