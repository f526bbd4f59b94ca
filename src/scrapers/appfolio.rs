use crate::error::ScoutError;
use crate::fetch;
use crate::scrapers::traits::ApartmentSite;
use crate::scrapers::types::ListingCriteria;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::OnceCell;
use tracing::info;

/// One property listed through the shared AppFolio vendor markup.
///
/// The listing pages all render unit records as `<dl>` blocks whose `<dd>`
/// fields carry the availability date (tagged with the
/// `js-listing-available` class) and the unit type, with the street address
/// in `span.u-pad-rm` elements two levels up. Which records count as a
/// match is entirely a property of the configured [`ListingCriteria`].
pub struct AppfolioSite {
    name: String,
    url: String,
    criteria: ListingCriteria,
    client: Client,
    message: OnceCell<String>,
}

impl AppfolioSite {
    pub fn new(name: &str, url: &str, criteria: ListingCriteria, client: Client) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            criteria,
            client,
            message: OnceCell::new(),
        }
    }
}

pub fn middleton_center(client: &Client) -> AppfolioSite {
    AppfolioSite::new(
        "Middleton Center",
        "https://twall.appfolio.com/listings?1551932808827&filters%5Bproperty_list%5D=MIDDLETON%20CENTER%20ALL%20PHASES",
        ListingCriteria::two_bedroom(),
        client.clone(),
    )
}

pub fn conservancy_bend(client: &Client) -> AppfolioSite {
    AppfolioSite::new(
        "Conservancy Bend",
        "https://twall.appfolio.com/listings?1552018640986&filters%5Bproperty_list%5D=CONSERVANCY%20BEND",
        ListingCriteria::two_bedroom(),
        client.clone(),
    )
}

/// Units at Veritas Village worth a notification.
const VERITAS_UNITS: &[&str] = &["108", "210", "310", "410", "337", "204", "304", "404", "104"];

pub fn veritas_village(client: &Client) -> AppfolioSite {
    AppfolioSite::new(
        "Veritas Village",
        "https://twall.appfolio.com/listings?1552018640986&filters%5Bproperty_list%5D=VERITAS%20VILLAGE%2C%20LLC",
        ListingCriteria::units_of_interest(VERITAS_UNITS),
        client.clone(),
    )
}

pub fn wingra_center(client: &Client) -> AppfolioSite {
    AppfolioSite::new(
        "Wingra Center",
        "https://brunerrealty.appfolio.com/listings?1665708928491&filters%5Border_by%5D=date_posted",
        ListingCriteria::two_bedroom_at("arbor"),
        client.clone(),
    )
}

#[async_trait]
impl ApartmentSite for AppfolioSite {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, ScoutError> {
        fetch::get(&self.client, &self.url).await
    }

    async fn availability_message(&self) -> Result<&str, ScoutError> {
        self.message
            .get_or_try_init(|| async {
                info!("Checking {} for available units", self.name);
                let html = self.fetch().await?;
                Ok(extract_message(&html, &self.criteria))
            })
            .await
            .map(String::as_str)
    }
}

/// Walk every listing block on the page and collect the text of the ones
/// the criteria accept.
fn extract_message(html: &str, criteria: &ListingCriteria) -> String {
    let document = Html::parse_document(html);
    let block_selector = Selector::parse("dl").unwrap();
    let field_selector = Selector::parse("dd").unwrap();
    let address_selector = Selector::parse("span.u-pad-rm").unwrap();

    let mut message = String::new();
    for block in document.select(&block_selector) {
        let address = joined_address(block, &address_selector);

        if let Some(fragment) = &criteria.address_contains {
            if !address.to_lowercase().contains(fragment.as_str()) {
                continue;
            }
        }

        let unit_wanted = match &criteria.unit_numbers {
            Some(units) => units.iter().any(|unit| address.contains(unit.as_str())),
            None => true,
        };

        let mut available = false;
        let mut bedrooms = false;
        for field in block.select(&field_selector) {
            let content = field.text().collect::<String>();
            let content = content.trim();

            if is_availability_field(&field) {
                available = criteria.month_match.matches(content);
            } else if criteria
                .bedroom_prefixes
                .iter()
                .any(|prefix| content.starts_with(prefix.as_str()))
            {
                bedrooms = true;
            }

            if available && bedrooms && unit_wanted {
                message.push_str(&block.text().collect::<String>());
                if criteria.first_match_only {
                    break;
                }
            }
        }
    }

    message
}

/// The availability date field carries `js-listing-available` as its second
/// class in this vendor's markup.
fn is_availability_field(field: &ElementRef) -> bool {
    field.value().classes().nth(1) == Some("js-listing-available")
}

/// Street address spans live on the block's grandparent container; joined
/// with ";" so unit-number and street-name checks see all of them.
fn joined_address(block: ElementRef, address_selector: &Selector) -> String {
    block
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.parent().and_then(ElementRef::wrap))
        .map(|container| {
            container
                .select(address_selector)
                .map(|span| span.text().collect::<String>())
                .collect::<Vec<_>>()
                .join(";")
        })
        .unwrap_or_default()
}
