use std::path::Path;
use std::sync::Mutex;

use na_core::{ArticleRecord, Result};

use crate::RecordExporter;

/// Exporter that keeps records in memory instead of writing a file. The
/// destination name is ignored. Used by tests that want to inspect what a
/// run would have persisted.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    records: Mutex<Vec<ArticleRecord>>,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything exported so far, across calls, in export order.
    pub fn records(&self) -> Vec<ArticleRecord> {
        self.records.lock().expect("exporter lock poisoned").clone()
    }
}

impl RecordExporter for MemoryExporter {
    fn export(&self, records: &[ArticleRecord], _destination: &Path) -> Result<()> {
        self.records
            .lock()
            .expect("exporter lock poisoned")
            .extend_from_slice(records);
        Ok(())
    }
}
