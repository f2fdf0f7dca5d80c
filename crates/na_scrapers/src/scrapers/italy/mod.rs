pub mod repubblica;

pub use repubblica::RepubblicaScraper;
