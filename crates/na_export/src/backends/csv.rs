use std::path::Path;

use na_core::{ArticleRecord, Result, FIELD_NAMES};

use crate::RecordExporter;

/// Writes records as a CSV file with one header row, in the canonical
/// field order. Keyword and character sequences are flattened by
/// [`ArticleRecord::as_row`].
#[derive(Debug, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

impl RecordExporter for CsvExporter {
    fn export(&self, records: &[ArticleRecord], destination: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(destination)?;
        writer.write_record(FIELD_NAMES)?;
        for record in records {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;
        Ok(())
    }
}
