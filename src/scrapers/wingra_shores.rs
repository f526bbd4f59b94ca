use crate::error::ScoutError;
use crate::fetch;
use crate::models::DESIRED_MONTHS;
use crate::scrapers::traits::ApartmentSite;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// The upstream server rejects requests without a browser-looking agent.
const UNIT_PAGE_AGENT: &str = "Mozilla/5.0";

/// Wingra Shores publishes one page per unit behind the property page,
/// so this site crawls every hyperlink whose target contains "unit" and
/// reads the availability date off each sub-page.
pub struct WingraShoresSite {
    name: String,
    url: String,
    client: Client,
    message: OnceCell<String>,
}

impl WingraShoresSite {
    pub fn new(client: &Client) -> Self {
        Self {
            name: "Wingra Shores".to_string(),
            url: "https://jmichaelrealestate.com/property/2628-arbor-drive/".to_string(),
            client: client.clone(),
            message: OnceCell::new(),
        }
    }

    async fn compose_message(&self) -> Result<String, ScoutError> {
        info!("Checking {} for available units", self.name);
        let html = self.fetch().await?;
        let links = unit_links(&html);
        debug!("Found {} candidate unit pages", links.len());

        let mut pages = Vec::with_capacity(links.len());
        for link in links {
            let fetched = fetch::get_as(&self.client, &link, UNIT_PAGE_AGENT).await;
            pages.push((link, fetched));
        }

        Ok(collect_unit_lines(&self.name, pages))
    }
}

#[async_trait]
impl ApartmentSite for WingraShoresSite {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, ScoutError> {
        fetch::get_as(&self.client, &self.url, UNIT_PAGE_AGENT).await
    }

    async fn availability_message(&self) -> Result<&str, ScoutError> {
        self.message
            .get_or_try_init(|| self.compose_message())
            .await
            .map(String::as_str)
    }
}

/// Evaluate each fetched unit page. One broken page must not hide
/// availability on the others, so failures are logged and skipped rather
/// than propagated.
fn collect_unit_lines(site_name: &str, pages: Vec<(String, Result<String, ScoutError>)>) -> String {
    let mut lines = Vec::new();
    for (url, fetched) in pages {
        match fetched.and_then(|html| unit_availability(&url, &html)) {
            Ok(Some(title)) => {
                info!("Unit available: {}", title);
                lines.push(format!("{} apartment available: {}", site_name, title));
            }
            Ok(None) => {}
            Err(err) => warn!("Skipping unit page {}: {}", url, err),
        }
    }

    lines.join("\n")
}

/// Hyperlinks on the property page whose target names a unit sub-page.
fn unit_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| href.contains("unit"))
        .map(str::to_owned)
        .collect()
}

/// Read the "Available" label off a unit page and return the page title
/// when the adjacent date falls in the desired window.
fn unit_availability(url: &str, html: &str) -> Result<Option<String>, ScoutError> {
    let document = Html::parse_document(html);
    let label_selector = Selector::parse("strong").unwrap();

    let label = document
        .select(&label_selector)
        .find(|el| el.text().collect::<String>().to_lowercase().contains("available"))
        .ok_or_else(|| ScoutError::Parse {
            url: url.to_string(),
            what: "\"available\" label",
        })?;

    let date_text = label
        .next_sibling()
        .and_then(|node| node.value().as_text().map(|text| text.to_string()))
        .ok_or_else(|| ScoutError::Parse {
            url: url.to_string(),
            what: "availability date",
        })?;

    let month = date_text
        .trim()
        .split('/')
        .next()
        .and_then(|head| head.trim().parse::<u32>().ok());

    match month {
        Some(month) if DESIRED_MONTHS.contains(&month) => {
            Ok(Some(page_title(&document).unwrap_or_else(|| url.to_string())))
        }
        _ => Ok(None),
    }
}

fn page_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").unwrap();
    document
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_links_keeps_only_unit_targets() {
        let html = r#"<html><body>
            <a href="https://jmichaelrealestate.com/unit/2628-arbor-1/">Unit 1</a>
            <a href="https://jmichaelrealestate.com/about/">About</a>
            <a href="https://jmichaelrealestate.com/unit/2628-arbor-2/">Unit 2</a>
            <a name="anchor-without-target">x</a>
        </body></html>"#;
        let links = unit_links(html);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|link| link.contains("/unit/")));
    }

    fn unit_page(label: &str, date: &str) -> String {
        format!(
            r#"<html><head><title>Unit 2 - 2628 Arbor Drive</title></head>
            <body><p><strong>{label}</strong> {date}</p></body></html>"#
        )
    }

    #[test]
    fn in_window_unit_reports_its_title() {
        let html = unit_page("Available:", "4/1/2024");
        let title = unit_availability("https://x/unit/2", &html).unwrap();
        assert_eq!(title.as_deref(), Some("Unit 2 - 2628 Arbor Drive"));
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let html = unit_page("AVAILABLE", "5/15/2024");
        assert!(unit_availability("https://x/unit/2", &html).unwrap().is_some());
    }

    #[test]
    fn out_of_window_unit_is_silent() {
        let html = unit_page("Available:", "6/1/2024");
        assert!(unit_availability("https://x/unit/2", &html).unwrap().is_none());
    }

    #[test]
    fn unparseable_date_is_a_non_match() {
        let html = unit_page("Available:", "now");
        assert!(unit_availability("https://x/unit/2", &html).unwrap().is_none());
    }

    #[test]
    fn missing_label_is_a_parse_error() {
        let html = "<html><body><p>No availability info here</p></body></html>";
        let err = unit_availability("https://x/unit/2", html).unwrap_err();
        assert!(matches!(err, ScoutError::Parse { .. }));
    }

    #[test]
    fn missing_title_falls_back_to_the_url() {
        let html = r#"<html><body><strong>Available</strong> 3/1/2024</body></html>"#;
        let title = unit_availability("https://x/unit/9", html).unwrap();
        assert_eq!(title.as_deref(), Some("https://x/unit/9"));
    }

    #[test]
    fn a_failed_unit_page_does_not_mask_the_others() {
        let pages = vec![
            (
                "https://x/unit/1".to_string(),
                Err(ScoutError::Status {
                    url: "https://x/unit/1".to_string(),
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                }),
            ),
            ("https://x/unit/2".to_string(), Ok(unit_page("Available:", "4/1/2024"))),
            ("https://x/unit/3".to_string(), Ok(unit_page("Available:", "12/1/2024"))),
        ];

        let message = collect_unit_lines("Wingra Shores", pages);
        assert_eq!(
            message,
            "Wingra Shores apartment available: Unit 2 - 2628 Arbor Drive"
        );
    }
}
