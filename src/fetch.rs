use crate::error::ScoutError;
use anyhow::{Context, Result};
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Default user agent sent with every request unless a site overrides it.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the shared HTTP client used by every site in a run.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

/// GET a listing page and return its markup.
pub async fn get(client: &Client, url: &str) -> Result<String, ScoutError> {
    debug!("Fetching URL: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScoutError::Fetch {
            url: url.to_string(),
            source,
        })?;

    read_body(url, response).await
}

/// GET with a per-request `User-Agent` override, for servers that reject
/// the default one.
pub async fn get_as(client: &Client, url: &str, user_agent: &str) -> Result<String, ScoutError> {
    debug!("Fetching URL: {} (agent {})", url, user_agent);

    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|source| ScoutError::Fetch {
            url: url.to_string(),
            source,
        })?;

    read_body(url, response).await
}

/// POST a urlencoded form and return the response markup. The `Referer`
/// header rounds out the browser-mimicking header set; `Content-Type` is
/// set by the form encoder.
pub async fn post_form(
    client: &Client,
    url: &str,
    referer: &str,
    form: &[(&str, String)],
) -> Result<String, ScoutError> {
    debug!("Posting form to: {}", url);

    let response = client
        .post(url)
        .header(REFERER, referer)
        .header("X-Requested-With", "XMLHttpRequest")
        .form(form)
        .send()
        .await
        .map_err(|source| ScoutError::Fetch {
            url: url.to_string(),
            source,
        })?;

    read_body(url, response).await
}

async fn read_body(url: &str, response: Response) -> Result<String, ScoutError> {
    let status = response.status();
    if !status.is_success() {
        warn!("{} returned status: {}", url, status);
        return Err(ScoutError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await.map_err(|source| ScoutError::Fetch {
        url: url.to_string(),
        source,
    })?;

    debug!("Downloaded {} bytes of HTML", body.len());
    Ok(body)
}
