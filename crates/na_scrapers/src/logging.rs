use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Diagnostics sink injected into the components that report progress and
/// per-article failures, so tests can capture output with a stub instead of
/// scraping a global subscriber.
pub trait DiagnosticsSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
}

/// Production sink forwarding to `tracing`.
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

pub fn init_logging() {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(Level::INFO)
                .init();
        });
    }
}
