//! Core components for the shuffle between map and reduce.

pub mod group;

pub use group::*;
