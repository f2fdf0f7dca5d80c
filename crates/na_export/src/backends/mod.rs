pub mod csv;
pub mod memory;

pub use csv::CsvExporter;
pub use memory::MemoryExporter;
