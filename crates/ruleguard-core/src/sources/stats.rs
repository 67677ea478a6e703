use std::collections::HashMap;

use dashmap::DashMap;

use super::HistoricalStatsSource;
use crate::{errors::RuleError, types::HistoricalStat};

/// Fixed aggregates keyed by query string.
#[derive(Debug, Default, Clone)]
pub struct StaticStatsSource {
    stats: HashMap<String, HistoricalStat>,
}

impl StaticStatsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: impl Into<String>, stat: HistoricalStat) {
        let _ = self.stats.insert(query.into(), stat);
    }

    pub fn with_stat(mut self, query: impl Into<String>, stat: HistoricalStat) -> Self {
        self.insert(query, stat);
        self
    }
}

impl From<HashMap<String, HistoricalStat>> for StaticStatsSource {
    fn from(stats: HashMap<String, HistoricalStat>) -> Self {
        Self { stats }
    }
}

impl HistoricalStatsSource for StaticStatsSource {
    fn fetch(&self, query: &str) -> Result<HistoricalStat, RuleError> {
        self.stats
            .get(query)
            .copied()
            .ok_or_else(|| RuleError::StatsFetch {
                query: query.to_string(),
                message: "no aggregate registered for this query".to_string(),
            })
    }
}

/// Source used when no history is configured: every fetch fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl HistoricalStatsSource for NoHistory {
    fn fetch(&self, query: &str) -> Result<HistoricalStat, RuleError> {
        Err(RuleError::StatsFetch {
            query: query.to_string(),
            message: "no historical statistics source configured".to_string(),
        })
    }
}

/// Memoises another source by query string for the lifetime of the cache.
///
/// Failed fetches are not cached. There is no expiry.
pub struct CachedStatsSource<S> {
    inner: S,
    cache: DashMap<String, HistoricalStat>,
}

impl<S: HistoricalStatsSource> CachedStatsSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl<S: HistoricalStatsSource> HistoricalStatsSource for CachedStatsSource<S> {
    fn fetch(&self, query: &str) -> Result<HistoricalStat, RuleError> {
        if let Some(hit) = self.cache.get(query) {
            tracing::trace!(query, "historical stats cache hit");
            return Ok(*hit);
        }
        let stat = self.inner.fetch(query)?;
        self.cache.insert(query.to_string(), stat);
        Ok(stat)
    }
}
