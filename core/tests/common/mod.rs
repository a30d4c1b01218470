//! Common test utilities and helpers for integration tests

use async_trait::async_trait;
use mapflow_core::{Emitter, Job, Tuple};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// Upper bound for any single run in the tests; a hang means a lost close.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

/// Fail the test instead of hanging when `fut` never completes.
pub async fn within_timeout<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(RUN_TIMEOUT, fut)
        .await
        .expect("run did not complete in time")
}

/// Collapse result tuples into a map, asserting no key is reported twice.
pub fn to_map(tuples: Vec<Tuple>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for tuple in tuples {
        let (key, value) = tuple.into_parts();
        if let Some(previous) = map.insert(key.clone(), value) {
            panic!("key {key} reported twice (earlier value {previous})");
        }
    }
    map
}

/// Build the expected word count result.
pub fn counts(pairs: &[(&str, u64)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(word, count)| (word.to_string(), count.to_string()))
        .collect()
}

/// Assert that two vectors contain the same elements (order-independent)
#[allow(dead_code)] // only the word count tests compare raw tuple lists
pub fn assert_same_elements<T: Ord + Clone + std::fmt::Debug>(
    mut actual: Vec<T>,
    mut expected: Vec<T>,
) {
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}

/// Parses `key=value` records, remembers everything it emitted and every
/// reduce call it received, and emits `(key, number of values)` per group.
#[allow(dead_code)]
#[derive(Default)]
pub struct Ledger {
    pub emitted: Mutex<Vec<(String, String)>>,
    pub reduced: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

#[async_trait]
impl Job for Ledger {
    async fn map(&self, _key: String, value: String, sink: &Emitter) {
        for pair in value.split(',') {
            if let Some((k, v)) = pair.split_once('=') {
                self.emitted
                    .lock()
                    .unwrap()
                    .push((k.to_string(), v.to_string()));
                sink.emit((k, v)).await.unwrap();
            }
        }
    }

    async fn reduce(&self, key: String, values: Vec<String>, sink: &Emitter) {
        let count = values.len();
        self.reduced
            .lock()
            .unwrap()
            .entry(key.clone())
            .or_default()
            .push(values);
        sink.emit(Tuple::new(key, count.to_string())).await.unwrap();
    }
}
