use thiserror::Error;

/// Error taxonomy for one extraction run.
///
/// `Fetch` and `EmptyBody` are transport failures and always recoverable at
/// the point of use; `Extraction` is contained per article; `Navigation`
/// signals a structural assumption violation and is allowed to end the run,
/// as are the configuration variants.
#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("empty response body for {url}")]
    EmptyBody { url: String },

    #[error("extraction failed for \"{title}\" ({url})")]
    Extraction { title: String, url: String },

    #[error("unexpected pagination markup: {0}")]
    Navigation(String),

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("invalid article URL: {0:?}")]
    InvalidUrl(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
