pub mod extractor;
pub mod fetch;
pub mod logging;
pub mod scrapers;

pub use extractor::ArchiveExtractor;
pub use logging::{init_logging, DiagnosticsSink, TracingSink};
pub use scrapers::{source_by_name, sources, ArchiveSource, ArticleExtractor, ListingEntry, NewsSource};

pub mod prelude {
    pub use super::scrapers::{ArchiveSource, ArticleExtractor, NewsSource};
    pub use na_core::{ArticleRecord, Error, Result};
}
