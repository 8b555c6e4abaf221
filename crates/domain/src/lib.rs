//! Packbldr Domain - the container/inventory ownership model.
//!
//! An actor owns a flat collection of items; any item may be nested inside a
//! `Container` item, forming a forest of parent/child relationships. The
//! [`ContainerForest`] keeps that forest structurally sound under arbitrary
//! drag-and-drop reparenting: cycle rejection, dimensional-nesting detection,
//! and mutually consistent parent/children back-references after every move.
//!
//! This crate is pure: no I/O, no async. Persistence and notification live
//! behind ports in `packbldr-engine`.

pub mod entities;
pub mod error;
pub mod events;
pub mod forest;
pub mod ids;
pub mod value_objects;

pub use entities::{Item, ItemKind};
pub use error::DomainError;
pub use events::DimensionalNesting;
pub use forest::{
    ContainerEntry, ContainerForest, ForestError, InventoryView, MoveOutcome, Placement,
};
pub use ids::{ActorId, ItemId};
pub use value_objects::ItemName;
