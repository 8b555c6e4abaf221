//! Move item use case.
//!
//! The drag-and-drop reparent: load the actor's items, rewire the forest in
//! memory, persist the touched snapshots, then narrate a dimensional
//! nesting if one happened.

use std::sync::Arc;

use packbldr_domain::ContainerForest;

use crate::infrastructure::ports::{ChatPort, ItemRepo};

use super::error::ContainerError;
use super::types::{MoveItemInput, MoveItemResult};

/// Move item use case.
///
/// Orchestrates: load, forest move, persistence, notification. The
/// in-memory mutation and the persistence calls are treated as one unit -
/// if a save fails the caller gets an error and must not treat the move as
/// applied. The chat event goes out only after every save has completed, so
/// a failed persistence never narrates a move that did not commit.
pub struct MoveItem {
    item_repo: Arc<dyn ItemRepo>,
    chat: Arc<dyn ChatPort>,
}

impl MoveItem {
    pub fn new(item_repo: Arc<dyn ItemRepo>, chat: Arc<dyn ChatPort>) -> Self {
        Self { item_repo, chat }
    }

    /// Execute the move.
    ///
    /// # Returns
    /// * `Ok(MoveItemResult)` - Move committed (or tolerated as a no-op)
    /// * `Err(ContainerError)` - Unknown ids, a containment loop, or a
    ///   persistence failure
    pub async fn execute(&self, input: MoveItemInput) -> Result<MoveItemResult, ContainerError> {
        let items = self.item_repo.list_for_actor(input.actor_id).await?;
        let mut forest = ContainerForest::from_items(input.actor_id, items)?;

        let outcome = forest.move_item(input.item_id, input.target)?;

        for id in &outcome.touched {
            if let Some(item) = forest.get(*id) {
                self.item_repo.save(item).await?;
            }
        }

        if let Some(event) = outcome.dimensional_nesting.clone() {
            tracing::warn!(
                actor_id = %event.actor_id,
                dragged = %event.dragged_item,
                target = %event.target_item,
                "Extradimensional container nested inside another"
            );
            self.chat.post(event).await;
        }

        let item_name = forest
            .get(input.item_id)
            .map(|item| item.name.to_string())
            .unwrap_or_default();

        tracing::info!(
            actor_id = %input.actor_id,
            item_id = %input.item_id,
            placement = ?outcome.placement,
            changed = outcome.changed,
            "Item moved"
        );

        Ok(MoveItemResult {
            item_name,
            placement: outcome.placement,
            changed: outcome.changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockChatPort, MockItemRepo, RepoError};
    use packbldr_domain::{ActorId, Item, ItemId, ItemKind, ItemName, Placement};

    fn named(name: &str) -> ItemName {
        ItemName::new(name).unwrap()
    }

    fn container(actor: ActorId, name: &str) -> Item {
        Item::new(actor, named(name), ItemKind::Container)
    }

    fn dimensional_container(actor: ActorId, name: &str) -> Item {
        container(actor, name).with_dimensional(true)
    }

    fn weapon(actor: ActorId, name: &str) -> Item {
        Item::new(actor, named(name), ItemKind::Weapon)
    }

    fn repo_returning(actor: ActorId, items: Vec<Item>) -> MockItemRepo {
        let mut repo = MockItemRepo::new();
        repo.expect_list_for_actor()
            .withf(move |id| *id == actor)
            .returning(move |_| Ok(items.clone()));
        repo
    }

    #[tokio::test]
    async fn when_item_missing_returns_not_found_and_saves_nothing() {
        let actor = ActorId::new();
        let repo = repo_returning(actor, vec![]);
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let missing = ItemId::new();
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: missing,
                target: None,
            })
            .await;

        assert!(matches!(result, Err(ContainerError::ItemNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn when_move_would_cycle_nothing_is_saved() {
        let actor = ActorId::new();
        let mut outer = container(actor, "Outer");
        let mut inner = container(actor, "Inner");
        inner.parent = Some(outer.id);
        outer.children = vec![inner.id];
        let (outer_id, inner_id) = (outer.id, inner.id);

        let repo = repo_returning(actor, vec![outer, inner]);
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: outer_id,
                target: Some(inner_id),
            })
            .await;

        assert!(matches!(
            result,
            Err(ContainerError::WouldCycle { item, target })
                if item == outer_id && target == inner_id
        ));
    }

    #[tokio::test]
    async fn move_into_container_saves_both_touched_snapshots() {
        let actor = ActorId::new();
        let bag = container(actor, "Bag");
        let sword = weapon(actor, "Sword");
        let (bag_id, sword_id) = (bag.id, sword.id);

        let mut repo = repo_returning(actor, vec![bag, sword]);
        repo.expect_save()
            .withf(move |item| item.id == sword_id || item.id == bag_id)
            .times(2)
            .returning(|_| Ok(()));
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: sword_id,
                target: Some(bag_id),
            })
            .await
            .unwrap();

        assert_eq!(result.placement, Placement::Inside(bag_id));
        assert!(result.changed);
        assert_eq!(result.item_name, "Sword");
    }

    #[tokio::test]
    async fn self_drop_commits_nothing() {
        let actor = ActorId::new();
        let bag = container(actor, "Bag");
        let bag_id = bag.id;

        let repo = repo_returning(actor, vec![bag]);
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: bag_id,
                target: Some(bag_id),
            })
            .await
            .unwrap();

        assert!(!result.changed);
    }

    #[tokio::test]
    async fn dimensional_nesting_posts_to_chat_after_saving() {
        let actor = ActorId::new();
        let hole = dimensional_container(actor, "Portable Hole");
        let bag = dimensional_container(actor, "Bag of Holding");
        let (hole_id, bag_id) = (hole.id, bag.id);

        let mut repo = repo_returning(actor, vec![hole, bag]);
        repo.expect_save().times(2).returning(|_| Ok(()));

        let mut chat = MockChatPort::new();
        chat.expect_post()
            .withf(move |event| {
                event.actor_id == actor
                    && event.dragged_item.as_str() == "Portable Hole"
                    && event.target_item.as_str() == "Bag of Holding"
            })
            .times(1)
            .returning(|_| ());

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: hole_id,
                target: Some(bag_id),
            })
            .await
            .unwrap();

        assert_eq!(result.placement, Placement::Inside(bag_id));
    }

    #[tokio::test]
    async fn plain_nesting_stays_quiet() {
        let actor = ActorId::new();
        let sack = container(actor, "Sack");
        let chest = container(actor, "Chest");
        let (sack_id, chest_id) = (sack.id, chest.id);

        let mut repo = repo_returning(actor, vec![sack, chest]);
        repo.expect_save().times(2).returning(|_| Ok(()));
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: sack_id,
                target: Some(chest_id),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn when_save_fails_move_is_not_reported_applied() {
        let actor = ActorId::new();
        let bag = container(actor, "Bag");
        let sword = weapon(actor, "Sword");
        let (bag_id, sword_id) = (bag.id, sword.id);

        let mut repo = repo_returning(actor, vec![bag, sword]);
        repo.expect_save()
            .times(1)
            .returning(|_| Err(RepoError::storage("save", "connection reset")));
        let chat = MockChatPort::new();

        let use_case = MoveItem::new(Arc::new(repo), Arc::new(chat));
        let result = use_case
            .execute(MoveItemInput {
                actor_id: actor,
                item_id: sword_id,
                target: Some(bag_id),
            })
            .await;

        assert!(matches!(result, Err(ContainerError::Repo(_))));
    }
}
