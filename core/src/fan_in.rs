//! Fan-in: merge many producer streams into one.
//!
//! Every producer gets a relay task that forwards its tuples into the shared
//! output and then reports on a private completion channel. A coordinator task
//! holds the last handle to the output and drops it only after it has counted
//! one completion per producer, so the merged stream closes exactly once and
//! never before every producer has been drained.
//!
//! The merged stream is bounded. Once its buffer is full, relays (and through
//! them the producers) wait until the consumer catches up; this is the only
//! backpressure in the engine.

use crate::tuple::Tuple;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Merge `producers` into a new stream with room for `capacity` tuples.
pub fn fan_in(producers: Vec<mpsc::Receiver<Tuple>>, capacity: usize) -> mpsc::Receiver<Tuple> {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    fan_in_into(producers, sender);
    receiver
}

/// Merge `producers` into an existing stream.
///
/// `output` is closed once every producer is drained (or once its reader has
/// gone away). The returned handle resolves to the number of tuples forwarded.
pub fn fan_in_into(
    producers: Vec<mpsc::Receiver<Tuple>>,
    output: mpsc::Sender<Tuple>,
) -> JoinHandle<usize> {
    let expected = producers.len();

    tokio::spawn(async move {
        let (done_tx, mut done_rx) = mpsc::channel::<usize>(expected.max(1));

        for (index, mut producer) in producers.into_iter().enumerate() {
            let output = output.clone();
            let done = done_tx.clone();
            tokio::spawn(async move {
                let mut forwarded = 0usize;
                while let Some(tuple) = producer.recv().await {
                    if output.send(tuple).await.is_err() {
                        // Reader is gone; dropping `producer` lets the
                        // upstream task see a closed sink.
                        trace!(producer = index, "merged stream closed, relay stopping");
                        break;
                    }
                    forwarded += 1;
                }
                drop(output);
                let _ = done.send(forwarded).await;
            });
        }
        drop(done_tx);

        let mut completed = 0usize;
        let mut total = 0usize;
        while completed < expected {
            match done_rx.recv().await {
                Some(forwarded) => {
                    completed += 1;
                    total += forwarded;
                }
                None => break,
            }
        }

        debug!(producers = expected, forwarded = total, "fan-in drained");
        drop(output);
        total
    })
}
