//! Local Task Scheduler
//!
//! Spawns one tokio task per map record or reduce key. Each task owns a
//! dedicated output stream; the stream closes when the task's job call
//! returns. By default nothing limits how many tasks run at once; a
//! concurrency bound can be opted into through [`EngineConfig`].

use crate::job::{Emitter, Job};
use crate::tuple::Tuple;
use futures::FutureExt;
use mapflow_common::{EngineConfig, MapflowError, Result, Stage};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{error, trace};

/// Buffer of a single task's stream. Tuples are handed over one at a time,
/// so a busy fan-in holds its producers back.
pub const TASK_STREAM_CAPACITY: usize = 1;

/// The set of tasks spawned for one stage of a run.
#[derive(Debug)]
pub struct StageTasks {
    stage: Stage,
    set: JoinSet<Result<()>>,
    spawned: usize,
}

impl StageTasks {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            set: JoinSet::new(),
            spawned: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of tasks spawned so far.
    pub fn len(&self) -> usize {
        self.spawned
    }

    pub fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// Wait for every task of the stage.
    ///
    /// The first task fault aborts all tasks still running and is returned;
    /// there is no isolation between tasks of a run. On success returns the
    /// number of tasks that ran.
    pub async fn join_all(mut self) -> Result<usize> {
        while let Some(joined) = self.set.join_next().await {
            let failure = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err,
                Err(join_err) => MapflowError::internal_with_source(
                    format!("{} task could not be joined", self.stage),
                    join_err,
                ),
            };
            error!(stage = %self.stage, error = %failure, "task failed, aborting stage");
            self.set.abort_all();
            return Err(failure);
        }
        Ok(self.spawned)
    }
}

/// LocalScheduler launches map and reduce tasks on the tokio runtime.
#[derive(Debug, Clone)]
pub struct LocalScheduler {
    permits: Option<Arc<Semaphore>>,
    max_concurrent_tasks: Option<usize>,
}

impl LocalScheduler {
    /// A scheduler that runs every task as soon as it is spawned.
    pub fn unbounded() -> Self {
        Self {
            permits: None,
            max_concurrent_tasks: None,
        }
    }

    /// A scheduler that lets at most `limit` tasks execute job code at once.
    /// Tasks are still spawned one per unit; extra ones wait for a slot.
    pub fn bounded(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Some(Arc::new(Semaphore::new(limit))),
            max_concurrent_tasks: Some(limit),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        match config.max_concurrent_tasks {
            Some(limit) => Self::bounded(limit),
            None => Self::unbounded(),
        }
    }

    pub fn max_concurrent_tasks(&self) -> Option<usize> {
        self.max_concurrent_tasks
    }

    /// Spawn a map task for one input record and return its output stream.
    pub fn spawn_map<J: Job>(
        &self,
        tasks: &mut StageTasks,
        job: Arc<J>,
        key: String,
        value: String,
    ) -> mpsc::Receiver<Tuple> {
        let task_key = key.clone();
        self.spawn_with(tasks, task_key, move |sink| async move {
            job.map(key, value, &sink).await;
        })
    }

    /// Spawn a reduce task for one key and return its output stream.
    pub fn spawn_reduce<J: Job>(
        &self,
        tasks: &mut StageTasks,
        job: Arc<J>,
        key: String,
        values: Vec<String>,
    ) -> mpsc::Receiver<Tuple> {
        let task_key = key.clone();
        self.spawn_with(tasks, task_key, move |sink| async move {
            job.reduce(key, values, &sink).await;
        })
    }

    fn spawn_with<F, Fut>(&self, tasks: &mut StageTasks, key: String, work: F) -> mpsc::Receiver<Tuple>
    where
        F: FnOnce(Emitter) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(TASK_STREAM_CAPACITY);
        let permits = self.permits.clone();
        let stage = tasks.stage;

        trace!(stage = %stage, key = %key, "spawning task");
        tasks.set.spawn(async move {
            let _permit = match permits {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(e) => {
                        return Err(MapflowError::internal_with_source(
                            "task slot semaphore closed",
                            e,
                        ));
                    }
                },
                None => None,
            };

            // The sink is dropped with `work`'s future, closing the stream.
            AssertUnwindSafe(work(Emitter::new(sender)))
                .catch_unwind()
                .await
                .map_err(|payload| {
                    MapflowError::task_panicked(stage, key, panic_message(payload.as_ref()))
                })
        });
        tasks.spawned += 1;

        receiver
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
