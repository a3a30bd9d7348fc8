use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Write;

use etl::error::EtlError;
use thiserror::Error;

/// Returns whether terminal output should include backtraces.
fn should_render_backtrace() -> bool {
    matches!(
        std::env::var("RUST_BACKTRACE").as_deref(),
        Ok("1") | Ok("full")
    )
}

/// Result type for consolidator operations.
pub type ConsolidatorResult<T> = Result<T, ConsolidatorError>;

/// Error type for the consolidator binary.
///
/// Wraps [`EtlError`] for pipeline errors and adds the startup failures that happen before a
/// pipeline exists.
#[derive(Debug, Error)]
pub enum ConsolidatorError {
    /// Pipeline or source error.
    #[error(transparent)]
    Etl(#[from] EtlError),

    /// Configuration or telemetry setup error.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// Runtime startup error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsolidatorError {
    /// Creates a configuration error from any error.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        ConsolidatorError::Config(Box::new(err))
    }

    /// Returns a short category label for this error.
    pub fn category(&self) -> &'static str {
        match self {
            ConsolidatorError::Etl(_) => "consolidation error",
            ConsolidatorError::Config(_) => "configuration error",
            ConsolidatorError::Io(_) => "i/o error",
        }
    }

    /// Returns the backtrace captured by the underlying pipeline error, if any.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            ConsolidatorError::Etl(err) => err.backtrace(),
            ConsolidatorError::Config(_) | ConsolidatorError::Io(_) => None,
        }
    }

    /// Returns a user-oriented report for terminal output.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "consolidator failed");
        let _ = writeln!(out, "category: {}", self.category());
        let _ = writeln!(out, "error: {self}");

        // Aggregated errors already render every contained error.
        if !matches!(self, ConsolidatorError::Etl(err) if err.errors().is_some()) {
            let mut source = self.source();
            let mut idx = 1usize;
            while let Some(err) = source {
                let _ = writeln!(out, "cause {idx}: {err}");
                source = err.source();
                idx += 1;
            }
        }

        if should_render_backtrace()
            && let Some(backtrace) = self.backtrace()
        {
            let _ = writeln!(out, "backtrace:\n{backtrace}");
        }

        out
    }
}
