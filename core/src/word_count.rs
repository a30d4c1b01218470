//! Word counting, the canonical map/reduce job.

use crate::job::{Emitter, Job};
use crate::tuple::Tuple;
use async_trait::async_trait;
use tracing::warn;

/// Maps each whitespace-separated word to `(word, "1")` and reduces by summing
/// the counts. Counts that fail to parse are logged and skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordCount;

#[async_trait]
impl Job for WordCount {
    async fn map(&self, key: String, value: String, sink: &Emitter) {
        for word in value.split_whitespace() {
            if let Err(err) = sink.emit((word, "1")).await {
                warn!(record = %key, error = %err, "map output closed");
                return;
            }
        }
    }

    async fn reduce(&self, key: String, values: Vec<String>, sink: &Emitter) {
        let mut count: i64 = 0;
        for value in &values {
            match value.parse::<i64>() {
                Ok(n) => count += n,
                Err(err) => warn!(word = %key, value = %value, error = %err, "reduce error"),
            }
        }

        if let Err(err) = sink.emit(Tuple::new(key, count.to_string())).await {
            warn!(error = %err, "reduce output closed");
        }
    }
}
