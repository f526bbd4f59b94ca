use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for a single site check.
///
/// `Fetch` and `Status` cover the transport layer, `Parse` covers expected
/// structure missing from a page, `Config` covers missing notifier
/// credentials. Only `Config` is fatal to the run; the rest are captured
/// per site by the aggregator.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url}: expected {what} not found")]
    Parse { url: String, what: &'static str },

    #[error("missing configuration: {0}")]
    Config(&'static str),
}
