//! The key/value pair exchanged between pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable pair of strings: `first` is the key, `second` the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tuple {
    first: String,
    second: String,
}

impl Tuple {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// The key.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The value.
    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn into_parts(self) -> (String, String) {
        (self.first, self.second)
    }
}

impl From<(String, String)> for Tuple {
    fn from((first, second): (String, String)) -> Self {
        Self { first, second }
    }
}

impl From<(&str, &str)> for Tuple {
    fn from((first, second): (&str, &str)) -> Self {
        Self::new(first, second)
    }
}

impl From<Tuple> for (String, String) {
    fn from(tuple: Tuple) -> Self {
        tuple.into_parts()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.first, self.second)
    }
}
