pub mod error;
pub mod types;

pub use error::Error;
pub use types::{ArticleRecord, DateSpan, FIELD_NAMES};

pub type Result<T> = std::result::Result<T, Error>;
