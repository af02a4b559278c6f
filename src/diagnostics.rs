use std::io;
use std::path::Path;

/// Where the data model reports problems it recovers from on its own.
///
/// Entries never fail because of these; the sink only gets told.
pub trait Diagnostics {
    fn stat_failed(&self, path: &Path, error: &io::Error);

    fn unknown_status(&self, raw: &str);
}

/// Forwards to `tracing`; what the binary uses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn stat_failed(&self, path: &Path, error: &io::Error) {
        tracing::warn!(path = %path.display(), error = %error, "stat failed, using defaults");
    }

    fn unknown_status(&self, raw: &str) {
        tracing::debug!(status = raw, "unknown metadata status, treating as none");
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn stat_failed(&self, _path: &Path, _error: &io::Error) {}

    fn unknown_status(&self, _raw: &str) {}
}
