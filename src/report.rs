use crate::models::SiteOutcome;
use crate::scrapers::ApartmentSite;
use tracing::{error, info};

/// Evaluate every site in order, capturing each result so one misbehaving
/// source never masks matches from the others.
pub async fn check_all(sites: &[Box<dyn ApartmentSite>]) -> Vec<SiteOutcome> {
    let mut results = Vec::with_capacity(sites.len());

    for site in sites {
        let outcome = match site.availability_message().await {
            Ok(message) => {
                if message.trim().is_empty() {
                    info!("No matching units at {}", site.name());
                } else {
                    info!("Found matching units at {}!", site.name());
                }
                Ok(message.to_string())
            }
            Err(err) => {
                error!("Failed to check {}: {}", site.name(), err);
                Err(err)
            }
        };

        results.push(SiteOutcome {
            name: site.name().to_string(),
            url: site.url().to_string(),
            outcome,
        });
    }

    results
}

/// Render the combined report: matched sites in input order as
/// name/url/message blocks separated by a blank line, then one diagnostic
/// line per failed site. Empty means "nothing to notify about".
pub fn compose(results: &[SiteOutcome]) -> String {
    let mut blocks = Vec::new();
    let mut failures = Vec::new();

    for result in results {
        match &result.outcome {
            Ok(message) if !message.trim().is_empty() => {
                blocks.push(format!("{}\n{}\n{}", result.name, result.url, message.trim()));
            }
            Ok(_) => {}
            Err(err) => failures.push(format!("Failed to check {}: {}", result.name, err)),
        }
    }

    blocks.extend(failures);
    blocks.join("\n\n")
}
