use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use na_core::{ArticleRecord, Error, Result};
use scraper::Html;

pub mod italy;
use italy::repubblica::RepubblicaScraper;

/// One archive-listing item: the resolved article URL paired with the
/// preview markup it was listed with. The preview travels as an owned HTML
/// fragment so it can outlive the listing document and be re-queried when
/// the full article page misses a field.
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub url: String,
    pub preview_html: String,
}

/// Archive navigation and listing filtering for one newspaper.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Returns the name of the news source.
    fn source(&self) -> &str;

    /// Returns a list of CLI shorthand names for this source.
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }

    /// URL of one page of the dated archive listing.
    fn listing_url(&self, date: NaiveDate, page: u32) -> String;

    /// Total number of listing pages for `date`.
    ///
    /// `Ok(None)` means the archive could not be reached, which is distinct
    /// from a real count. Unexpected pagination markup is an error and
    /// propagates.
    async fn page_count(&self, client: &reqwest::Client, date: NaiveDate) -> Result<Option<u32>>;

    /// Genuine, accessible article entries on a parsed listing page, in
    /// listing order, with the source's exclusion rules already applied.
    fn listing_entries(&self, listing: &Html) -> Vec<ListingEntry>;
}

/// Field resolution for one newspaper's article markup.
pub trait ArticleExtractor: Send + Sync {
    /// Extracts a structured record from a parsed full-article page,
    /// backfilling from the listing preview when one is available.
    ///
    /// Title is the only mandatory field beyond the URL; a page it cannot be
    /// resolved from fails as a whole. Any other unresolved field keeps its
    /// default.
    fn extract(
        &self,
        url: &str,
        page: &Html,
        preview: Option<&Html>,
    ) -> Result<ArticleRecord>;

    /// Canonical form of an article address found in a listing.
    fn normalize_url(&self, href: &str) -> String {
        href.to_string()
    }
}

/// A complete newspaper implementation: archive traversal plus field
/// extraction. Adding a newspaper means adding one implementation pair and
/// registering it in [`sources`].
pub trait NewsSource: ArchiveSource + ArticleExtractor {}

impl<T: ArchiveSource + ArticleExtractor> NewsSource for T {}

/// Returns all supported newspaper sources.
pub fn sources() -> Vec<Arc<dyn NewsSource>> {
    vec![Arc::new(RepubblicaScraper::new())]
}

/// Looks a source up by one of its CLI names.
pub fn source_by_name(name: &str) -> Result<Arc<dyn NewsSource>> {
    let wanted = name.to_lowercase();
    sources()
        .into_iter()
        .find(|source| source.cli_names().contains(&wanted.as_str()))
        .ok_or_else(|| Error::UnsupportedSource(name.to_string()))
}

/// Common selector helpers for scrapers.
pub(crate) mod select {
    use scraper::{Html, Selector};

    /// Concatenated text of the first node matching `selector`, or `None`
    /// when nothing matches or the match is blank. Treating blank text as
    /// absent lets fallback chains move on to the next markup variant.
    pub fn select_text(document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .filter(|text| !text.trim().is_empty())
    }

    /// Text of every node matching `selector`, in document order.
    pub fn select_texts(document: &Html, selector: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        document
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    /// Attribute value of the first node matching `selector`.
    pub fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string)
    }
}
