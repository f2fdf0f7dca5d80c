use std::path::Path;

use na_core::{ArticleRecord, Result};

pub mod backends;

pub use backends::csv::CsvExporter;
pub use backends::memory::MemoryExporter;

/// Sink for the records accumulated by one extraction run.
pub trait RecordExporter: Send + Sync {
    /// Persists `records` under `destination`, preserving their order.
    fn export(&self, records: &[ArticleRecord], destination: &Path) -> Result<()>;
}
