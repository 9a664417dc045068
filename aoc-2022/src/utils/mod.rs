//! Algorithms shared between puzzle solutions.

pub mod best_first;
