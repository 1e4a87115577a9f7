//! Per-tick contact classification.

mod classifier;

pub use classifier::{ContactClassifier, TickAccumulator, MIN_STEEP_DOT};
