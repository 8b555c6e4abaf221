//! Domain entities

mod item;

pub use item::{Item, ItemKind};
