mod error;
mod fetch;
mod models;
mod notify;
mod report;
mod scrapers;

use notify::{EmailNotifier, Notifier};
use scrapers::ApartmentSite;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Apartment Scout");
    info!("==================");

    // Missing notifier config fails the run up front, before any fetch.
    let notifier = EmailNotifier::from_env()?;

    let sites = scrapers::all_sites()?;
    info!("Checking {} listing sites for a March-May move-in", sites.len());

    run(&sites, &notifier).await
}

async fn run(sites: &[Box<dyn ApartmentSite>], notifier: &dyn Notifier) -> anyhow::Result<()> {
    let results = report::check_all(sites).await;
    let body = report::compose(&results);

    if body.trim().is_empty() {
        info!("No matching units found; nothing to send");
        return Ok(());
    }

    notifier.notify(&body).await?;
    info!("✅ Availability report sent");
    Ok(())
}
