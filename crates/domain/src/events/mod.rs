//! Domain Events
//!
//! Coarse-grained events raised by forest operations. The forest only raises
//! them; rendering and delivery (chat, log) belong to the notification
//! collaborator behind the engine's ports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ActorId;
use crate::value_objects::ItemName;

/// Raised when an extradimensional container ends up nested inside another
/// extradimensional container (directly or through intermediate containers).
///
/// Notable, flavor-significant, and deliberately non-blocking: the move
/// itself still commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionalNesting {
    pub actor_id: ActorId,
    pub dragged_item: ItemName,
    pub target_item: ItemName,
    pub occurred_at: DateTime<Utc>,
}

impl DimensionalNesting {
    pub fn new(actor_id: ActorId, dragged_item: ItemName, target_item: ItemName) -> Self {
        Self {
            actor_id,
            dragged_item,
            target_item,
            occurred_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        "dimensional_nesting"
    }
}

impl std::fmt::Display for DimensionalNesting {
    /// Narration line for chat adapters that post the event verbatim.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "I put my {} into my {} knowing full well that this opens a rift into the astral plane",
            self.dragged_item, self.target_item
        )
    }
}
