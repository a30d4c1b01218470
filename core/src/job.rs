//! The capability a caller implements to run a map/reduce computation.

use crate::tuple::Tuple;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// A map/reduce job.
///
/// Both operations push zero or more tuples into `sink` and then return;
/// returning is what tells the engine that the task has no more output. The
/// engine never looks at a job's own failures, so implementations log or
/// otherwise handle them. A job that never returns stalls the run.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Map one input record. `key` is the record's position in the input list,
    /// assigned by the engine.
    async fn map(&self, key: String, value: String, sink: &Emitter);

    /// Reduce every value grouped under `key`. Value order is unspecified.
    async fn reduce(&self, key: String, values: Vec<String>, sink: &Emitter);
}

/// Returned by [`Emitter::emit`] when nobody is reading the stream any more.
/// Carries the tuple that could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("output stream closed, tuple ({0}) was not delivered")]
pub struct EmitError(pub Tuple);

/// Write half of a task's dedicated output stream.
#[derive(Debug, Clone)]
pub struct Emitter {
    sender: mpsc::Sender<Tuple>,
}

impl Emitter {
    pub(crate) fn new(sender: mpsc::Sender<Tuple>) -> Self {
        Self { sender }
    }

    /// Create a standalone emitter and the stream it feeds. Handy for driving a
    /// job directly, outside of a run.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Tuple>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }

    /// Send a tuple downstream, waiting while the stream's buffer is full.
    pub async fn emit(&self, tuple: impl Into<Tuple>) -> Result<(), EmitError> {
        self.sender
            .send(tuple.into())
            .await
            .map_err(|mpsc::error::SendError(tuple)| EmitError(tuple))
    }

    /// Whether the reading side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
