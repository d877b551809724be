//! Company record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::store::StoredRecord;

/// A hiring company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,

    #[serde(deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(deserialize_with = "lenient::string")]
    pub industry: String,

    /// Head-count band, e.g. "50-100"
    #[serde(deserialize_with = "lenient::string")]
    pub size: String,

    #[serde(deserialize_with = "lenient::string")]
    pub location: String,

    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i32")]
    pub founded: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Company {
    /// Sample companies the service starts with
    pub fn samples() -> Vec<Company> {
        vec![
            Company {
                id: 1,
                name: "Tech Corp".to_string(),
                industry: "Technology".to_string(),
                size: "500-1000".to_string(),
                location: "San Francisco, CA".to_string(),
                description: "Leading technology company focused on innovation...".to_string(),
                website: Some("https://techcorp.com".to_string()),
                founded: Some(2010),
                ..Default::default()
            },
            Company {
                id: 2,
                name: "StartupXYZ".to_string(),
                industry: "SaaS".to_string(),
                size: "50-100".to_string(),
                location: "Remote".to_string(),
                description: "Fast-growing SaaS startup...".to_string(),
                website: Some("https://startupxyz.com".to_string()),
                founded: Some(2020),
                ..Default::default()
            },
        ]
    }

    /// Case-insensitive substring filters on industry and location, exact on size
    pub fn matches(&self, industry: Option<&str>, size: Option<&str>, location: Option<&str>) -> bool {
        if let Some(industry) = industry {
            if !contains_ignore_case(&self.industry, industry) {
                return false;
            }
        }
        if let Some(size) = size {
            if self.size != size {
                return false;
            }
        }
        if let Some(location) = location {
            if !contains_ignore_case(&self.location, location) {
                return false;
            }
        }
        true
    }
}

impl StoredRecord for Company {
    fn id(&self) -> u64 {
        self.id
    }

    fn assign_id(&mut self, id: u64) {
        self.id = id;
    }

    fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
