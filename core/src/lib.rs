//! Mapflow Core - in-process parallel map/reduce
//!
//! A run maps every input record in its own task, groups the mapped tuples by
//! key, reduces every key in its own task and hands the merged results back
//! as a single stream.
//!
//! ```no_run
//! use mapflow_core::{WordCount, run};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mut output = run(Arc::new(WordCount), ["the cat sat", "the dog ran"]);
//! while let Some(tuple) = output.recv().await {
//!     println!("{tuple}");
//! }
//! # }
//! ```

pub mod engine;
pub mod fan_in;
pub mod input;
pub mod job;
pub mod output;
pub mod scheduler;
pub mod shuffle;
pub mod tuple;
pub mod word_count;

pub use engine::{Engine, run};
pub use fan_in::{fan_in, fan_in_into};
pub use job::{EmitError, Emitter, Job};
pub use output::{RunOutput, RunStats};
pub use scheduler::{LocalScheduler, StageTasks};
pub use shuffle::{GroupTable, shuffle};
pub use tuple::Tuple;
pub use word_count::WordCount;

pub use mapflow_common::{EngineConfig, MapflowError, Result, Stage};
