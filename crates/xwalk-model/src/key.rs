//! Composite keys and the sparse per-bucket decision map.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::XwalkError;

/// Addresses one candidate cell as `(rank, source row)` within a bucket.
///
/// Serializes as the composite string `"rank,row"` so the decision map
/// stays a plain JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchKey {
    pub rank: usize,
    pub row: usize,
}

impl MatchKey {
    pub fn new(rank: usize, row: usize) -> Self {
        Self { rank, row }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rank, self.row)
    }
}

impl FromStr for MatchKey {
    type Err = XwalkError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || XwalkError::InvalidMatchKey(raw.to_string());
        let (rank, row) = raw.split_once(',').ok_or_else(invalid)?;
        Ok(Self {
            rank: rank.parse().map_err(|_| invalid())?,
            row: row.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for MatchKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// The sparse set of review decisions for one bucket.
///
/// Absent keys are undecided; an explicit `false` records a rejection,
/// which matters for toggle resolution even though both render unmatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmedMatches {
    entries: BTreeMap<MatchKey, bool>,
}

impl ConfirmedMatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_confirmed(&self, key: MatchKey) -> bool {
        self.entries.get(&key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: MatchKey, confirmed: bool) {
        self.entries.insert(key, confirmed);
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatchKey, bool)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    /// Keys explicitly marked confirmed, in key order.
    pub fn confirmed_keys(&self) -> impl Iterator<Item = MatchKey> + '_ {
        self.entries
            .iter()
            .filter(|(_, confirmed)| **confirmed)
            .map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(MatchKey, bool)> for ConfirmedMatches {
    fn from_iter<I: IntoIterator<Item = (MatchKey, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
