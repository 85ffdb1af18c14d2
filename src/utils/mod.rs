//! Utility functions and helpers

pub mod math;

pub use math::{circles_overlap, normalized};
