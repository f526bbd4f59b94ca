pub mod appfolio;
pub mod traits;
pub mod types;
pub mod valencia;
pub mod wingra_shores;

pub use appfolio::AppfolioSite;
pub use traits::ApartmentSite;
pub use valencia::ValenciaSite;
pub use wingra_shores::WingraShoresSite;

use crate::fetch;
use anyhow::Result;

/// The full site roster, in report order.
pub fn all_sites() -> Result<Vec<Box<dyn ApartmentSite>>> {
    let client = fetch::build_client()?;

    Ok(vec![
        Box::new(appfolio::middleton_center(&client)),
        Box::new(appfolio::conservancy_bend(&client)),
        Box::new(appfolio::veritas_village(&client)),
        Box::new(appfolio::wingra_center(&client)),
        Box::new(WingraShoresSite::new(&client)),
        Box::new(ValenciaSite::new(&client)),
    ])
}
