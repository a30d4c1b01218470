//! The caller's side of a run: the merged result stream plus a handle on the
//! background orchestration.

use crate::tuple::Tuple;
use futures::Stream;
use mapflow_common::{MapflowError, Result};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub run_id: Uuid,
    /// One per input record.
    pub map_tasks: usize,
    /// Tuples emitted by all map tasks together.
    pub intermediate_tuples: usize,
    /// One per distinct key seen in the map output.
    pub reduce_tasks: usize,
    /// Tuples delivered on the output stream.
    pub output_tuples: usize,
    pub elapsed: Duration,
}

/// Output of [`Engine::run`](crate::Engine::run).
///
/// Tuples arrive in no particular order once reduce tasks start emitting. The
/// stream closes after the last reduce task is done, or early if the run
/// aborts; in that case whatever was received is not a meaningful partial
/// result and [`RunOutput::join`] reports the fault.
#[derive(Debug)]
pub struct RunOutput {
    receiver: mpsc::Receiver<Tuple>,
    handle: JoinHandle<Result<RunStats>>,
}

impl RunOutput {
    pub(crate) fn new(receiver: mpsc::Receiver<Tuple>, handle: JoinHandle<Result<RunStats>>) -> Self {
        Self { receiver, handle }
    }

    /// Next result tuple, or `None` once the stream is closed.
    pub async fn recv(&mut self) -> Option<Tuple> {
        self.receiver.recv().await
    }

    /// Receive every remaining tuple.
    pub async fn collect_all(&mut self) -> Vec<Tuple> {
        let mut tuples = Vec::new();
        while let Some(tuple) = self.receiver.recv().await {
            tuples.push(tuple);
        }
        tuples
    }

    /// Wait for the run to finish and report how it ended.
    ///
    /// Tuples not received yet are discarded; tasks still emitting see a
    /// closed sink.
    pub async fn join(self) -> Result<RunStats> {
        let Self { receiver, handle } = self;
        drop(receiver);
        handle
            .await
            .map_err(|e| MapflowError::internal_with_source("run orchestrator did not complete", e))?
    }

    /// Drain the stream, then wait for the run.
    pub async fn finish(mut self) -> Result<(Vec<Tuple>, RunStats)> {
        let tuples = self.collect_all().await;
        let stats = self.join().await?;
        Ok((tuples, stats))
    }

    /// Detach from the orchestrator and keep only the raw stream.
    pub fn into_receiver(self) -> mpsc::Receiver<Tuple> {
        self.receiver
    }
}

impl Stream for RunOutput {
    type Item = Tuple;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Tuple>> {
        self.receiver.poll_recv(cx)
    }
}
