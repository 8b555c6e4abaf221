//! Packbldr Engine library.
//!
//! Application-layer orchestration for the container forest.
//!
//! ## Structure
//!
//! - `infrastructure/` - Port traits at the persistence and notification
//!   boundaries (the only abstractions in the engine)
//! - `use_cases/` - User story orchestration: load an actor's items, run the
//!   forest operation, persist the touched snapshots, notify
//!
//! The engine holds no locks; callers serialize mutating operations per
//! actor (single writer per actor).

pub mod infrastructure;
pub mod use_cases;
