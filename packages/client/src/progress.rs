//! Progress reporting for the per-city and per-hotel loops.
//!
//! The pipeline only ever reports "how many units, how far along, what is
//! happening now". The binary renders that with `indicatif`; tests and
//! library callers that do not care pass [`NullProgress`].

/// Receives progress updates from a long-running loop.
pub trait ProgressCallback: Send + Sync {
    /// Starts a new run of `total` units at position zero.
    fn set_total(&self, total: u64);

    fn inc(&self, delta: u64);

    /// Describes the unit currently being worked on.
    fn set_message(&self, msg: String);

    /// Ends the run with a summary line.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
