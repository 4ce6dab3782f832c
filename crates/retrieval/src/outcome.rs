//! Outcome sum types for the retrieval service boundary.
//!
//! Callers see degradation explicitly instead of silently-emptied results:
//! `Degraded` means the capability was unavailable and no external call was
//! attempted; `Failed` means a call was attempted and errored.

/// Outcome of a best-effort read.
#[derive(Debug)]
pub enum Retrieved<T> {
    /// Query ran; zero or more hits.
    Hits(Vec<T>),
    /// Capability unconfigured; retrieval skipped.
    Degraded(String),
    /// Retrieval attempted but the embedding or store call errored.
    Failed(anyhow::Error),
}

impl<T> Retrieved<T> {
    /// Collapses the outcome to the legacy view: hits, or empty on
    /// degradation/failure.
    pub fn into_hits(self) -> Vec<T> {
        match self {
            Retrieved::Hits(hits) => hits,
            Retrieved::Degraded(_) | Retrieved::Failed(_) => Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Retrieved::Degraded(_))
    }
}

/// Outcome of a best-effort write.
#[derive(Debug)]
pub enum WriteOutcome {
    /// Record written.
    Stored,
    /// Capability unconfigured; write skipped.
    Degraded(String),
    /// Write attempted but the embedding or store call errored.
    Failed(anyhow::Error),
}

impl WriteOutcome {
    /// The legacy boolean view of the outcome.
    pub fn stored(&self) -> bool {
        matches!(self, WriteOutcome::Stored)
    }
}
