//! Container use cases.
//!
//! Drag-and-drop moves, cross-actor detaches, and the inventory view.
//! Each use case loads the actor's items through [`crate::infrastructure::ports::ItemRepo`],
//! runs the forest operation in memory, and persists exactly the snapshots
//! the operation touched before reporting success.

mod detach_item;
mod error;
mod move_item;
mod types;
mod view_inventory;

pub use detach_item::DetachItem;
pub use error::ContainerError;
pub use move_item::MoveItem;
pub use types::{DetachItemResult, MoveItemInput, MoveItemResult};
pub use view_inventory::ViewInventory;
