//! Value objects - validated-by-construction wrappers over primitives

mod names;

pub use names::ItemName;
