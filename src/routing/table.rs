//! Sender to destination lookup.

use std::collections::HashMap;

/// Append `ids` to `list`, skipping any id already present.
///
/// Keeps first-seen order. Quadratic, which is fine for rule-sized lists.
pub fn append_unique(list: &mut Vec<i64>, ids: impl IntoIterator<Item = i64>) {
    for id in ids {
        if !list.contains(&id) {
            list.push(id);
        }
    }
}

/// Immutable mapping from sender id to destination ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    entries: HashMap<String, Vec<i64>>,
}

impl RoutingTable {
    /// Build a table from `(sender, ids)` pairs.
    ///
    /// Repeated senders are merged; duplicate ids are dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<i64>)>,
        S: Into<String>,
    {
        let mut map: HashMap<String, Vec<i64>> = HashMap::new();
        for (sender, ids) in entries {
            append_unique(map.entry(sender.into()).or_default(), ids);
        }
        Self { entries: map }
    }

    /// Destinations for `sender`, falling back to the default (empty) sender.
    ///
    /// Returns an empty slice when neither entry exists.
    pub fn resolve(&self, sender: &str) -> &[i64] {
        self.entries
            .get(sender)
            .or_else(|| self.entries.get(""))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of senders with an entry (including the default sender).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of distinct (sender, destination) routes.
    pub fn route_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
