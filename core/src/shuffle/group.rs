//! Groups mapped tuples by key ahead of the reduce stage.

use crate::tuple::Tuple;
use std::collections::HashMap;
use std::collections::hash_map;
use tokio::sync::mpsc;

/// Intermediate table from key to every value emitted under it.
///
/// Values keep their arrival order. Because map tasks race each other, that
/// order differs from run to run and is left that way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupTable {
    groups: HashMap<String, Vec<String>>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the tuple's value to the group of its key.
    pub fn insert(&mut self, tuple: Tuple) {
        let (key, value) = tuple.into_parts();
        self.groups.entry(key).or_default().push(value);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of values across all groups.
    pub fn total_values(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl IntoIterator for GroupTable {
    type Item = (String, Vec<String>);
    type IntoIter = hash_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<Tuple> for GroupTable {
    fn from_iter<I: IntoIterator<Item = Tuple>>(iter: I) -> Self {
        let mut table = Self::new();
        for tuple in iter {
            table.insert(tuple);
        }
        table
    }
}

/// Drain `input` into a [`GroupTable`].
///
/// Returns only once the stream is closed, which makes this the barrier
/// between the map and reduce stages.
pub async fn shuffle(mut input: mpsc::Receiver<Tuple>) -> GroupTable {
    let mut table = GroupTable::new();
    while let Some(tuple) = input.recv().await {
        table.insert(tuple);
    }
    table
}
