//! Reviewer personas. Each pipeline stage prompts the completion service as one role.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Analyst,
    Architect,
    ProductOwner,
    UxDesigner,
    QaLead,
    BusinessAnalyst,
    SecurityExpert,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Analyst,
        Role::Architect,
        Role::ProductOwner,
        Role::UxDesigner,
        Role::QaLead,
        Role::BusinessAnalyst,
        Role::SecurityExpert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Analyst => "analyst",
            Role::Architect => "architect",
            Role::ProductOwner => "product_owner",
            Role::UxDesigner => "ux_designer",
            Role::QaLead => "qa_lead",
            Role::BusinessAnalyst => "business_analyst",
            Role::SecurityExpert => "security_expert",
        }
    }

    /// Markdown section title this role's output is filed under.
    pub fn heading(&self) -> &'static str {
        match self {
            Role::Analyst => "Technical Analysis",
            Role::Architect => "Architectural Design",
            Role::ProductOwner => "Product Owner Stories",
            Role::UxDesigner => "UX Design Stories",
            Role::QaLead => "QA Lead Assessment",
            Role::BusinessAnalyst => "Business Analyst Assessment",
            Role::SecurityExpert => "Security Expert Assessment",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "scrum_master".parse::<Role>().unwrap_err();
        assert!(err.contains("scrum_master"));
    }
}
