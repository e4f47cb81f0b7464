use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCount {
    pub name: String,
    pub count: u64,
}

impl DomainCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Per-domain totals sorted ascending by domain name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainCounts(Vec<DomainCount>);

impl DomainCounts {
    pub(crate) fn from_map(counts: HashMap<String, u64>) -> Self {
        let mut domains: Vec<DomainCount> = counts
            .into_iter()
            .map(|(name, count)| DomainCount { name, count })
            .collect();
        // Names are unique map keys, so an unstable sort is deterministic.
        domains.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        Self(domains)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DomainCount> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DomainCount] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.0
            .binary_search_by(|d| d.name.as_str().cmp(name))
            .ok()
            .map(|i| self.0[i].count)
    }

    /// Number of rows that contributed a domain.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|d| d.count).sum()
    }

    pub fn into_vec(self) -> Vec<DomainCount> {
        self.0
    }
}

impl<'a> IntoIterator for &'a DomainCounts {
    type Item = &'a DomainCount;
    type IntoIter = std::slice::Iter<'a, DomainCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub domains: DomainCounts,
    pub rows_read: u64,
    pub rows_skipped: u64,
}
