//! Engine - runs a job through the map, shuffle and reduce stages
//!
//! A run fans every input record out to its own map task, merges their
//! output, groups it by key, fans every key out to its own reduce task and
//! merges their output into the stream handed back to the caller.

use crate::fan_in::{fan_in, fan_in_into};
use crate::job::Job;
use crate::output::{RunOutput, RunStats};
use crate::scheduler::{LocalScheduler, StageTasks};
use crate::shuffle::shuffle;
use crate::tuple::Tuple;
use mapflow_common::{EngineConfig, MapflowError, Result, Stage};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Engine holds the configuration runs are started with.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine, falling back to the default configuration if
    /// `config` is invalid.
    pub fn new(config: EngineConfig) -> Self {
        match config.validate() {
            Ok(()) => Self { config },
            Err(err) => {
                warn!(error = %err, "invalid engine configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Create an engine, rejecting an invalid configuration.
    pub fn try_new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a run of `job` over `input`.
    ///
    /// Returns at once; the stages execute in the background. Every record is
    /// mapped exactly once under its index as key, and every key seen in the
    /// map output is reduced exactly once. Must be called inside a tokio
    /// runtime.
    pub fn run<J, I, S>(&self, job: Arc<J>, input: I) -> RunOutput
    where
        J: Job,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input: Vec<String> = input.into_iter().map(Into::into).collect();
        let run_id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.config.buffer_capacity);

        let span = info_span!("mapflow_run", %run_id, records = input.len());
        let handle = tokio::spawn(
            orchestrate(self.config.clone(), job, input, sender, run_id).instrument(span),
        );

        RunOutput::new(receiver, handle)
    }
}

/// Start a run with the default configuration.
pub fn run<J, I, S>(job: Arc<J>, input: I) -> RunOutput
where
    J: Job,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Engine::default().run(job, input)
}

async fn orchestrate<J: Job>(
    config: EngineConfig,
    job: Arc<J>,
    input: Vec<String>,
    output: mpsc::Sender<Tuple>,
    run_id: Uuid,
) -> Result<RunStats> {
    let started = Instant::now();
    let scheduler = LocalScheduler::from_config(&config);

    let mut map_tasks = StageTasks::new(Stage::Map);
    let map_streams: Vec<_> = input
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            scheduler.spawn_map(&mut map_tasks, Arc::clone(&job), index.to_string(), value)
        })
        .collect();
    let map_count = map_tasks.len();
    info!(
        map_tasks = map_count,
        max_concurrent_tasks = ?scheduler.max_concurrent_tasks(),
        "map stage started"
    );

    let merged = fan_in(map_streams, config.buffer_capacity);
    let (table, _) = tokio::try_join!(
        async { Ok::<_, MapflowError>(shuffle(merged).await) },
        map_tasks.join_all(),
    )?;

    let intermediate_tuples = table.total_values();
    info!(
        intermediate_tuples,
        distinct_keys = table.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "shuffle complete"
    );

    let mut reduce_tasks = StageTasks::new(Stage::Reduce);
    let reduce_streams: Vec<_> = table
        .into_iter()
        .map(|(key, values)| {
            scheduler.spawn_reduce(&mut reduce_tasks, Arc::clone(&job), key, values)
        })
        .collect();
    let reduce_count = reduce_tasks.len();
    debug!(reduce_tasks = reduce_count, "reduce stage started");

    let relay = fan_in_into(reduce_streams, output);
    reduce_tasks.join_all().await?;
    let output_tuples = relay
        .await
        .map_err(|e| MapflowError::internal_with_source("output fan-in did not complete", e))?;

    let stats = RunStats {
        run_id,
        map_tasks: map_count,
        intermediate_tuples,
        reduce_tasks: reduce_count,
        output_tuples,
        elapsed: started.elapsed(),
    };
    info!(
        map_tasks = stats.map_tasks,
        reduce_tasks = stats.reduce_tasks,
        output_tuples = stats.output_tuples,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "run complete"
    );
    Ok(stats)
}
