//! Container use case input/result types.

use packbldr_domain::{ActorId, ItemId, Placement};

/// Input for moving an item into a container or to top level.
#[derive(Debug, Clone)]
pub struct MoveItemInput {
    pub actor_id: ActorId,
    pub item_id: ItemId,
    /// `None` drops the item at top level.
    pub target: Option<ItemId>,
}

/// Result of a committed move.
#[derive(Debug, Clone)]
pub struct MoveItemResult {
    pub item_name: String,
    pub placement: Placement,
    /// False when the drop was a tolerated no-op.
    pub changed: bool,
}

/// Result of detaching an item to top level.
#[derive(Debug, Clone)]
pub struct DetachItemResult {
    pub item_name: String,
    pub changed: bool,
}
