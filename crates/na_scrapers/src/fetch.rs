use na_core::{Error, Result};
use reqwest::Client;

/// Fetches one page of raw HTML.
///
/// Every failure mode here is a recoverable transport outcome: non-2xx
/// status, connection/TLS errors and empty bodies all come back as `Err`
/// values for the caller to degrade on. Timeouts are the client's concern.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().await.map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })?;

    if body.is_empty() {
        return Err(Error::EmptyBody {
            url: url.to_string(),
        });
    }
    Ok(body)
}
