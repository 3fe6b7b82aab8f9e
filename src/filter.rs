//! Gates that decide whether an entry is delivered at all.
//!
//! Level acceptance is checked by the logging integration before the hook is
//! fired; the content filters run inside `fire`.

use crate::entry::{Level, LogEntry};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A predicate over log entries. Returning `false` vetoes delivery.
///
/// Filters must be total and free of side effects.
pub type Filter = Arc<dyn Fn(&LogEntry) -> bool + Send + Sync>;

/// An ordered sequence of filters, evaluated until the first veto.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, filter: F)
    where
        F: Fn(&LogEntry) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns true if no filter vetoes the entry. An empty chain passes everything.
    pub fn passes(&self, entry: &LogEntry) -> bool {
        self.filters.iter().all(|filter| filter(entry))
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl<F> FromIterator<F> for FilterChain
where
    F: Fn(&LogEntry) -> bool + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut chain = FilterChain::new();
        for filter in iter {
            chain.push(filter);
        }
        chain
    }
}

/// The set of levels a hook accepts. Empty means every level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet(BTreeSet<Level>);

impl LevelSet {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, level: Level) -> bool {
        self.0.is_empty() || self.0.contains(&level)
    }

    /// The accepted levels, least severe first.
    pub fn levels(&self) -> Vec<Level> {
        if self.0.is_empty() {
            Level::ALL.to_vec()
        } else {
            self.0.iter().copied().collect()
        }
    }

    /// Accepts `level` and everything more severe.
    pub fn at_least(level: Level) -> Self {
        Level::ALL.iter().copied().filter(|l| *l >= level).collect()
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
