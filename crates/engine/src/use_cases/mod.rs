//! User story orchestration across the container forest.

pub mod containers;
