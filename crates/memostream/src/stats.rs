/// Point-in-time counters of a cache. Values are read with relaxed ordering and are meant for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub(crate) source_calls: u64,
    pub(crate) cached: usize,
    pub(crate) active_cursors: usize,
}

impl Stats {
    /// Completed calls into the source, including the one that reported exhaustion or failure.
    pub fn source_calls(&self) -> u64 {
        self.source_calls
    }

    pub fn cached(&self) -> usize {
        self.cached
    }

    pub fn active_cursors(&self) -> usize {
        self.active_cursors
    }
}
