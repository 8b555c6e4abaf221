//! Container operation errors.

use packbldr_domain::{ForestError, ItemId};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Inserting item would create a loop: {item} is an ancestor of {target}")]
    WouldCycle { item: ItemId, target: ItemId },
    #[error("Duplicate item id in actor collection: {0}")]
    DuplicateItem(ItemId),
    #[error("Forest inconsistency: {0}")]
    Inconsistent(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ForestError> for ContainerError {
    fn from(err: ForestError) -> Self {
        match err {
            ForestError::UnknownItem(id) => Self::ItemNotFound(id),
            ForestError::Cycle { item, target } => Self::WouldCycle { item, target },
            ForestError::DuplicateItem(id) => Self::DuplicateItem(id),
            ForestError::Inconsistent(detail) => Self::Inconsistent(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forest_errors_map_to_container_errors() {
        let id = ItemId::new();
        let other = ItemId::new();

        assert!(matches!(
            ContainerError::from(ForestError::UnknownItem(id)),
            ContainerError::ItemNotFound(mapped) if mapped == id
        ));
        assert!(matches!(
            ContainerError::from(ForestError::Cycle { item: id, target: other }),
            ContainerError::WouldCycle { item, target } if item == id && target == other
        ));
    }

    #[test]
    fn cycle_error_message_mentions_the_loop() {
        let err = ContainerError::WouldCycle {
            item: ItemId::new(),
            target: ItemId::new(),
        };
        assert!(err.to_string().contains("create a loop"));
    }
}
