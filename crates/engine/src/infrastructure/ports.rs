//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - Item storage (could be a database, a VTT document store, a test double)
//! - Chat/notification delivery (could be a websocket, a message log)
//!
//! The engine performs no persistence I/O of its own: it hands mutated item
//! snapshots back through [`ItemRepo::save`], keyed by item id.

use async_trait::async_trait;

use packbldr_domain::{ActorId, DimensionalNesting, Item};

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Storage operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Storage error with operation context.
    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for the external item store.
///
/// Item snapshots live outside the engine; the engine reads one actor's
/// collection, rewires containment links in memory, and writes back the
/// snapshots that changed. A move is durably committed only once every
/// `save` has completed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    /// All items owned by the actor, in collection order.
    async fn list_for_actor(&self, actor_id: ActorId) -> Result<Vec<Item>, RepoError>;

    /// Update one item snapshot, keyed by item id.
    async fn save(&self, item: &Item) -> Result<(), RepoError>;
}

/// Port for the notification collaborator (chat, log).
///
/// Fire-and-forget: delivery failures are the adapter's concern, never the
/// move's. Implementations render the event however they see fit - the
/// event's `Display` gives the stock narration line.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn post(&self, event: DimensionalNesting);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_error_not_found_names_the_entity() {
        let err = RepoError::not_found("Item", "some-id");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Item not found: some-id"));
    }

    #[test]
    fn repo_error_storage_names_the_operation() {
        let err = RepoError::storage("save", "connection reset");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("save"));
        assert!(err.to_string().contains("connection reset"));
    }
}
