//! View inventory use case.
//!
//! Read-only: loads the actor's items, heals any corrupted links, and
//! returns the display grouping for sheet rendering. Healed links are not
//! written back here; the next mutating operation persists them.

use std::sync::Arc;

use packbldr_domain::{ActorId, ContainerForest, InventoryView};

use crate::infrastructure::ports::ItemRepo;

use super::error::ContainerError;

/// View inventory use case.
pub struct ViewInventory {
    item_repo: Arc<dyn ItemRepo>,
}

impl ViewInventory {
    pub fn new(item_repo: Arc<dyn ItemRepo>) -> Self {
        Self { item_repo }
    }

    pub async fn execute(&self, actor_id: ActorId) -> Result<InventoryView, ContainerError> {
        let items = self.item_repo.list_for_actor(actor_id).await?;
        let forest = ContainerForest::from_items(actor_id, items)?;
        Ok(forest.inventory_view())
    }
}
