use crate::models::DESIRED_MONTHS;
use serde::{Deserialize, Serialize};

/// How a site's availability token encodes its month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MonthMatch {
    /// Token begins with the month's decimal digits ("4/15/2024" → "4").
    Prefix,
    /// Integer before the first "/" parsed numerically; anything that does
    /// not parse is simply not a match.
    Numeric,
}

impl MonthMatch {
    /// Test an availability token against the desired move-in window.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.trim();
        match self {
            MonthMatch::Prefix => {
                DESIRED_MONTHS.into_iter().any(|month| token.starts_with(&month.to_string()))
            }
            MonthMatch::Numeric => token
                .split('/')
                .next()
                .and_then(|head| head.trim().parse::<u32>().ok())
                .map_or(false, |month| DESIRED_MONTHS.contains(&month)),
        }
    }
}

/// Predicate bundle for one property on a shared-vendor listing page.
///
/// The four configured properties differ only in these parameters, not in
/// the walk over the markup, so one extractor takes the bundle instead of
/// each property hard-coding its own lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCriteria {
    pub month_match: MonthMatch,
    /// Accepted leading fragments of the bedroom token ("2 bd", "Studio").
    pub bedroom_prefixes: Vec<String>,
    /// When set, the joined ancestor address must contain one of these unit
    /// numbers as a substring.
    pub unit_numbers: Option<Vec<String>>,
    /// When set, blocks whose joined address lacks this fragment
    /// (case-insensitive) are skipped before any other predicate runs.
    pub address_contains: Option<String>,
    /// Stop scanning a block's fields after its first qualifying record;
    /// otherwise every qualifying record appends again.
    pub first_match_only: bool,
}

impl ListingCriteria {
    /// Two-bedroom filter shared by the TWall properties.
    pub fn two_bedroom() -> Self {
        Self {
            month_match: MonthMatch::Prefix,
            bedroom_prefixes: vec!["2 bd".to_string()],
            unit_numbers: None,
            address_contains: None,
            first_match_only: true,
        }
    }

    /// Studio/one-bedroom filter restricted to an allow-list of units.
    pub fn units_of_interest(units: &[&str]) -> Self {
        Self {
            month_match: MonthMatch::Prefix,
            bedroom_prefixes: vec!["Studio".to_string(), "1".to_string()],
            unit_numbers: Some(units.iter().map(|u| u.to_string()).collect()),
            address_contains: None,
            first_match_only: false,
        }
    }

    /// Two-bedroom filter for a single property on a multi-property page,
    /// selected by a street-name fragment.
    pub fn two_bedroom_at(address_fragment: &str) -> Self {
        Self {
            month_match: MonthMatch::Numeric,
            bedroom_prefixes: vec!["2 bd".to_string()],
            unit_numbers: None,
            address_contains: Some(address_fragment.to_lowercase()),
            first_match_only: false,
        }
    }
}
