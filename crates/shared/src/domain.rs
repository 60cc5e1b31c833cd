use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(CompanyId);

/// Analyst prioritization tier attached to every company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyStatus {
    #[serde(rename = "Top Prospect")]
    TopProspect,
    #[serde(rename = "Promising Opportunity")]
    Promising,
    #[serde(rename = "Needs Review")]
    NeedsReview,
    #[serde(rename = "Low Potential")]
    LowPotential,
}

impl CompanyStatus {
    pub const ALL: [CompanyStatus; 4] = [
        CompanyStatus::TopProspect,
        CompanyStatus::Promising,
        CompanyStatus::NeedsReview,
        CompanyStatus::LowPotential,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompanyStatus::TopProspect => "Top Prospect",
            CompanyStatus::Promising => "Promising Opportunity",
            CompanyStatus::NeedsReview => "Needs Review",
            CompanyStatus::LowPotential => "Low Potential",
        }
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown company status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CompanyStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CompanyStatus::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Status predicate applied by the listing query.
///
/// An unrecognized label is kept rather than dropped so that it matches
/// nothing instead of silently widening to every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CompanyStatus),
    Unrecognized(String),
}

impl StatusFilter {
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => StatusFilter::All,
            Some(value) => value
                .parse::<CompanyStatus>()
                .map(StatusFilter::Only)
                .unwrap_or_else(|UnknownStatus(value)| StatusFilter::Unrecognized(value)),
        }
    }

    pub fn matches(&self, status: CompanyStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
            StatusFilter::Unrecognized(_) => false,
        }
    }
}

impl From<Option<CompanyStatus>> for StatusFilter {
    fn from(value: Option<CompanyStatus>) -> Self {
        match value {
            Some(status) => StatusFilter::Only(status),
            None => StatusFilter::All,
        }
    }
}
