use std::sync::Arc;

use chrono::NaiveDate;
use na_core::{ArticleRecord, DateSpan, Result};
use scraper::Html;

use crate::fetch::fetch_page;
use crate::logging::DiagnosticsSink;
use crate::scrapers::{ListingEntry, NewsSource};

/// Drives one extraction run over a newspaper's dated archive.
///
/// Three traversal modes compose top-down: a range walks its days, a day
/// walks its listing pages, a page walks its filtered entries. Failures
/// local to one article or one listing page are logged and skipped; an
/// unavailable page count skips that date; only navigation failures
/// propagate. The record set only ever grows.
pub struct ArchiveExtractor {
    client: reqwest::Client,
    source: Arc<dyn NewsSource>,
    diag: Arc<dyn DiagnosticsSink>,
    records: Vec<ArticleRecord>,
}

impl ArchiveExtractor {
    pub fn new(source: Arc<dyn NewsSource>, diag: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            client: reqwest::Client::new(),
            source,
            diag,
            records: Vec::new(),
        }
    }

    /// Records accumulated so far, in extraction order.
    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }

    /// Extracts every surviving entry of one archive listing page.
    pub async fn extract_page(&mut self, date: NaiveDate, page: u32) -> Result<()> {
        let url = self.source.listing_url(date, page);
        let body = match fetch_page(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                self.diag.debug(&format!("listing fetch failed: {}", e));
                return Ok(());
            }
        };

        let listing = Html::parse_document(&body);
        for entry in self.source.listing_entries(&listing) {
            match self.extract_entry(&entry).await {
                Ok(record) => self.records.push(record),
                Err(e) => self.diag.debug(&e.to_string()),
            }
        }
        Ok(())
    }

    /// Extracts every listing page of one archive day, ascending. An
    /// unreachable archive contributes nothing and is not an error.
    pub async fn extract_day(&mut self, date: NaiveDate) -> Result<()> {
        let pages = match self.source.page_count(&self.client, date).await? {
            Some(pages) => pages,
            None => {
                self.diag
                    .info(&format!("archive unavailable for {}, skipping", date));
                return Ok(());
            }
        };

        self.diag
            .info(&format!("extracting articles for {} ({} pages)", date, pages));
        for page in 1..=pages {
            self.extract_page(date, page).await?;
        }
        Ok(())
    }

    /// Extracts every day in `[start, end)`, ascending.
    pub async fn extract_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        for date in DateSpan::new(start, end) {
            self.extract_day(date).await?;
        }
        Ok(())
    }

    async fn extract_entry(&self, entry: &ListingEntry) -> Result<ArticleRecord> {
        let body = fetch_page(&self.client, &entry.url).await?;
        let page = Html::parse_document(&body);
        let preview = Html::parse_fragment(&entry.preview_html);
        self.source.extract(&entry.url, &page, Some(&preview))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::italy::RepubblicaScraper;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct CapturingSink {
        lines: Mutex<Vec<String>>,
    }

    impl CapturingSink {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl DiagnosticsSink for CapturingSink {
        fn debug(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("debug: {}", message));
        }

        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("info: {}", message));
        }
    }

    fn entry_html(url: &str, preview: &str) -> String {
        format!(
            r#"<article>
                <span>(21) Cronaca</span>
                <h2><a href="{}">link</a></h2>
                <p>{}</p>
            </article>"#,
            url, preview
        )
    }

    fn listing_html(total_pages: u32, entries: &str) -> String {
        format!(
            r#"<html><body>
                <div class="pagination"><p>1 di {}</p></div>
                {}
            </body></html>"#,
            total_pages, entries
        )
    }

    fn article_html(title: &str) -> String {
        format!(
            r#"<html><body>
                <article><h1>{}</h1></article>
                <span itemprop="articleBody">Il testo dell'articolo.</span>
            </body></html>"#,
            title
        )
    }

    fn listing_path(year: i32, month: u32, day: u32) -> String {
        format!("/repubblica/archivio/repubblica/{}/{}/{}", year, month, day)
    }

    async fn mount_listing(server: &MockServer, date_path: &str, page: u32, body: String) {
        Mock::given(method("GET"))
            .and(path(date_path))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn mount_article(server: &MockServer, article_path: &str, title: &str) {
        Mock::given(method("GET"))
            .and(path(article_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(article_html(title)))
            .mount(server)
            .await;
    }

    fn extractor_for(server: &MockServer) -> (ArchiveExtractor, Arc<CapturingSink>) {
        let sink = Arc::new(CapturingSink::default());
        let extractor = ArchiveExtractor::new(
            Arc::new(RepubblicaScraper::with_base_url(server.uri())),
            sink.clone(),
        );
        (extractor, sink)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_page_mode_keeps_order_and_skips_failed_articles() {
        let server = MockServer::start().await;
        let entries = format!(
            "{}{}{}",
            entry_html(
                &format!("{}/primo.html", server.uri()),
                "Anteprima del primo articolo."
            ),
            entry_html(
                &format!("{}/rotto.html", server.uri()),
                "Anteprima di un articolo irraggiungibile."
            ),
            entry_html(
                &format!("{}/secondo.html", server.uri()),
                "Anteprima del secondo articolo."
            ),
        );
        mount_listing(&server, &listing_path(2015, 3, 4), 1, listing_html(1, &entries)).await;
        mount_article(&server, "/primo.html", "Primo").await;
        mount_article(&server, "/secondo.html", "Secondo").await;
        // /rotto.html is not mounted and 404s.

        let (mut extractor, sink) = extractor_for(&server);
        extractor.extract_page(date(2015, 3, 4), 1).await.unwrap();

        let titles: Vec<&str> = extractor
            .records()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Primo", "Secondo"]);
        assert!(sink.lines().iter().any(|l| l.starts_with("debug:")));
    }

    #[tokio::test]
    async fn test_page_mode_listing_fetch_failure_is_contained() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (mut extractor, _sink) = extractor_for(&server);
        extractor.extract_page(date(2015, 3, 4), 1).await.unwrap();
        assert!(extractor.records().is_empty());
    }

    #[tokio::test]
    async fn test_page_mode_discards_record_on_extraction_failure() {
        let server = MockServer::start().await;
        let entries = entry_html(
            &format!("{}/senza-titolo.html", server.uri()),
            "Anteprima di una pagina senza titolo.",
        );
        mount_listing(&server, &listing_path(2015, 3, 4), 1, listing_html(1, &entries)).await;
        Mock::given(method("GET"))
            .and(path("/senza-titolo.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><p>nessun titolo qui</p></body></html>".to_string(),
            ))
            .mount(&server)
            .await;

        let (mut extractor, sink) = extractor_for(&server);
        extractor.extract_page(date(2015, 3, 4), 1).await.unwrap();

        assert!(extractor.records().is_empty());
        assert!(sink
            .lines()
            .iter()
            .any(|l| l.contains("extraction failed")));
    }

    #[tokio::test]
    async fn test_day_mode_walks_pages_ascending() {
        let server = MockServer::start().await;
        let day_path = listing_path(2015, 3, 4);
        mount_listing(
            &server,
            &day_path,
            1,
            listing_html(
                2,
                &entry_html(
                    &format!("{}/pagina1.html", server.uri()),
                    "Anteprima dalla prima pagina.",
                ),
            ),
        )
        .await;
        mount_listing(
            &server,
            &day_path,
            2,
            listing_html(
                2,
                &entry_html(
                    &format!("{}/pagina2.html", server.uri()),
                    "Anteprima dalla seconda pagina.",
                ),
            ),
        )
        .await;
        mount_article(&server, "/pagina1.html", "Dalla pagina uno").await;
        mount_article(&server, "/pagina2.html", "Dalla pagina due").await;

        let (mut extractor, _sink) = extractor_for(&server);
        extractor.extract_day(date(2015, 3, 4)).await.unwrap();

        let titles: Vec<&str> = extractor
            .records()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Dalla pagina uno", "Dalla pagina due"]);
    }

    #[tokio::test]
    async fn test_day_mode_unavailable_archive_yields_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (mut extractor, sink) = extractor_for(&server);
        extractor.extract_day(date(2015, 3, 4)).await.unwrap();

        assert!(extractor.records().is_empty());
        assert!(sink.lines().iter().any(|l| l.contains("unavailable")));
    }

    #[tokio::test]
    async fn test_day_mode_bad_pagination_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>archivio rifatto</p></body></html>"),
            )
            .mount(&server)
            .await;

        let (mut extractor, _sink) = extractor_for(&server);
        let result = extractor.extract_day(date(2015, 3, 4)).await;
        assert!(matches!(result, Err(na_core::Error::Navigation(_))));
    }

    #[tokio::test]
    async fn test_range_mode_visits_each_day_once_half_open() {
        let server = MockServer::start().await;
        for day in [4, 5] {
            let day_path = listing_path(2015, 3, day);
            let article_path = format!("/giorno{}.html", day);
            Mock::given(method("GET"))
                .and(path(&*day_path))
                .and(query_param("page", "1"))
                .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
                    1,
                    &entry_html(
                        &format!("{}{}", server.uri(), article_path),
                        "Anteprima del giorno in rassegna.",
                    ),
                )))
                // Page 1 serves the page count probe and the page walk.
                .expect(2)
                .mount(&server)
                .await;
            mount_article(&server, &article_path, &format!("Giorno {}", day)).await;
        }
        // The end date is excluded from iteration and must never be fetched.
        Mock::given(method("GET"))
            .and(path(&*listing_path(2015, 3, 6)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut extractor, _sink) = extractor_for(&server);
        extractor
            .extract_range(date(2015, 3, 4), date(2015, 3, 6))
            .await
            .unwrap();

        let titles: Vec<&str> = extractor
            .records()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Giorno 4", "Giorno 5"]);
    }
}
