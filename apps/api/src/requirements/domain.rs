//! Domain detection. Picks the business domain whose prompt wording a requirement gets.

use std::fmt;
use std::str::FromStr;

/// Business sector used to select specialized specification templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Ecommerce,
    Healthcare,
    Fintech,
    General,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Ecommerce,
        Domain::Healthcare,
        Domain::Fintech,
        Domain::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Ecommerce => "ecommerce",
            Domain::Healthcare => "healthcare",
            Domain::Fintech => "fintech",
            Domain::General => "general",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown domain '{s}'"))
    }
}

/// Keyword sets in priority order. First match wins.
///
/// "payment" appears in both ecommerce and fintech; ecommerce is checked first,
/// so a payment-only requirement is always ecommerce.
const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Ecommerce,
        &["payment", "ecommerce", "shop", "cart", "order", "product"],
    ),
    (
        Domain::Healthcare,
        &["patient", "medical", "health", "clinical", "hospital"],
    ),
    (
        Domain::Fintech,
        &["payment", "bank", "financial", "transaction", "money"],
    ),
];

/// Classifies a requirement by case-insensitive substring match against the keyword sets.
pub fn detect_domain(requirement: &str) -> Domain {
    let lowered = requirement.to_lowercase();

    DOMAIN_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(domain, _)| *domain)
        .unwrap_or(Domain::General)
}
