use crate::error::ScoutError;
use async_trait::async_trait;

/// Common trait for all listing sites.
/// This allows easy addition of new sources behind the same run loop.
#[async_trait]
pub trait ApartmentSite: Send + Sync {
    /// Display name used in the report and in logs.
    fn name(&self) -> &str;

    /// The url of the page (or endpoint) this site is checked against.
    fn url(&self) -> &str;

    /// Fetch the primary page's raw markup.
    async fn fetch(&self) -> Result<String, ScoutError>;

    /// Compose the availability message for this site.
    ///
    /// Computed lazily on first call and cached for the lifetime of the
    /// instance; a fresh run constructs fresh instances. "No match" is the
    /// empty string, never an error.
    async fn availability_message(&self) -> Result<&str, ScoutError>;
}
