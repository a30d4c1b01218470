//! Task Scheduler module
//!
//! This module spawns the per-record map tasks and per-key reduce tasks of a
//! run on the tokio runtime.

pub mod local_scheduler;

pub use local_scheduler::*;
