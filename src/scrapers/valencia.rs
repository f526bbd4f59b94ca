use crate::error::ScoutError;
use crate::fetch;
use crate::models::DESIRED_MONTHS;
use crate::scrapers::traits::ApartmentSite;
use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::OnceCell;
use tracing::{debug, info};

const ENDPOINT: &str = "https://www.valenciaapts.com/availability.php";
const FLOOR_PLANS_PAGE: &str = "https://www.valenciaapts.com/floor-plans/";
const PROPERTY_ID: &str = "valencia";

/// Valencia's availability endpoint takes a urlencoded search form and
/// answers with the listings fragment directly. The endpoint filters by
/// the request parameters, so every unit card in the response is already a
/// match and its text is reported verbatim.
pub struct ValenciaSite {
    name: String,
    url: String,
    client: Client,
    message: OnceCell<String>,
}

impl ValenciaSite {
    pub fn new(client: &Client) -> Self {
        Self {
            name: "Valencia".to_string(),
            url: ENDPOINT.to_string(),
            client: client.clone(),
            message: OnceCell::new(),
        }
    }
}

#[async_trait]
impl ApartmentSite for ValenciaSite {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, ScoutError> {
        let form = form_body(Local::now().date_naive());
        fetch::post_form(&self.client, &self.url, FLOOR_PLANS_PAGE, &form).await
    }

    async fn availability_message(&self) -> Result<&str, ScoutError> {
        self.message
            .get_or_try_init(|| async {
                info!("Checking {} for available units", self.name);
                let html = self.fetch().await?;
                let message = unit_cards(&html);
                if message.is_empty() {
                    debug!("No unit cards in response");
                }
                Ok(message)
            })
            .await
            .map(String::as_str)
    }
}

/// The fixed search form. Everything except the move-in date is constant.
fn form_body(today: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("property", PROPERTY_ID.to_string()),
        ("den", "0".to_string()),
        ("bedrooms", "2".to_string()),
        ("date", move_in_date_field(today)),
        ("sort", "rent".to_string()),
        ("aprtlink", "1".to_string()),
    ]
}

/// First day of the desired window; once the window has passed this year,
/// ask for next year's.
fn move_in_date_field(today: NaiveDate) -> String {
    let year = if today.month() >= DESIRED_MONTHS.end {
        today.year() + 1
    } else {
        today.year()
    };
    format!("{:02}/01/{}", DESIRED_MONTHS.start, year)
}

/// Collect every unit card's visible text, stripped and newline-joined.
fn unit_cards(html: &str) -> String {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.unit-card").unwrap();

    document
        .select(&card_selector)
        .map(|card| {
            card.text()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_the_full_field_set() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let form = form_body(today);
        let keys: Vec<&str> = form.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            ["property", "den", "bedrooms", "date", "sort", "aprtlink"]
        );
    }

    #[test]
    fn move_in_date_targets_the_window_start() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(move_in_date_field(today), "03/01/2024");
    }

    #[test]
    fn move_in_date_rolls_over_after_the_window() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert_eq!(move_in_date_field(today), "03/01/2025");
    }

    #[test]
    fn window_months_still_target_the_current_year() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        assert_eq!(move_in_date_field(today), "03/01/2024");
    }

    #[test]
    fn unit_cards_join_stripped_text() {
        let html = r#"<html><body>
            <div class="unit-card">
                <h3> Unit 204 </h3>
                <p>2 bd / 2 ba</p>
                <p>$2,150</p>
            </div>
            <div class="other">ignored</div>
            <div class="unit-card"><h3>Unit 305</h3><p>$2,400</p></div>
        </body></html>"#;
        let message = unit_cards(html);
        assert_eq!(message, "Unit 204\n2 bd / 2 ba\n$2,150\nUnit 305\n$2,400");
    }

    #[test]
    fn no_cards_means_no_message() {
        assert!(unit_cards("<html><body><p>nothing open</p></body></html>").is_empty());
    }
}
