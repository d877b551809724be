//! Job listing record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::store::StoredRecord;

/// A job listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Job {
    /// Assigned by the data store, ignored on input
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,

    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(deserialize_with = "lenient::string")]
    pub company: String,

    #[serde(deserialize_with = "lenient::string")]
    pub location: String,

    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    /// Kept as submitted: a range like "$80,000 - $100,000" or a number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Value>,

    /// Employment type, e.g. "Full-time"
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub job_type: String,

    /// Posting date as `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub posted_date: Option<String>,

    #[serde(deserialize_with = "lenient::string_list")]
    pub requirements: Vec<String>,

    #[serde(deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub experience: Option<String>,

    #[serde(deserialize_with = "lenient::flag")]
    pub remote: bool,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Any additional fields submitted with the listing
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A job returned by the search engine with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: Job,

    /// Relevance score; absent when the engine sorted without scoring
    pub score: Option<f64>,
}

impl Job {
    /// Sample listings the service starts with
    pub fn samples() -> Vec<Job> {
        vec![
            Job {
                id: 1,
                title: "Senior Software Engineer".to_string(),
                company: "Tech Corp".to_string(),
                location: "San Francisco, CA".to_string(),
                description: "We're looking for a senior engineer to join our team...".to_string(),
                salary: Some(Value::from("$120,000 - $150,000")),
                job_type: "Full-time".to_string(),
                posted_date: Some("2024-01-15".to_string()),
                requirements: strings(&["JavaScript", "React", "Node.js", "AWS"]),
                skills: strings(&["JavaScript", "React", "Node.js", "AWS", "TypeScript"]),
                experience: Some("5+ years".to_string()),
                remote: false,
                ..Default::default()
            },
            Job {
                id: 2,
                title: "Frontend Developer".to_string(),
                company: "StartupXYZ".to_string(),
                location: "Remote".to_string(),
                description: "Join our fast-growing startup as a frontend developer...".to_string(),
                salary: Some(Value::from("$80,000 - $100,000")),
                job_type: "Full-time".to_string(),
                posted_date: Some("2024-01-14".to_string()),
                requirements: strings(&["React", "TypeScript", "CSS", "Git"]),
                skills: strings(&["React", "TypeScript", "CSS", "Git", "JavaScript"]),
                experience: Some("2+ years".to_string()),
                remote: true,
                ..Default::default()
            },
        ]
    }

    /// Lower bound of the advertised salary.
    ///
    /// Numbers are taken as is; text yields its first amount, so
    /// "$80,000 - $100,000" gives 80000.
    pub fn salary_floor(&self) -> Option<u64> {
        match self.salary.as_ref()? {
            Value::Number(n) => n.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64),
            Value::String(s) => {
                let digits: String = s
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit() || *c == ',')
                    .filter(char::is_ascii_digit)
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }
}

impl StoredRecord for Job {
    fn id(&self) -> u64 {
        self.id
    }

    fn assign_id(&mut self, id: u64) {
        self.id = id;
    }

    fn stamp(&mut self, now: DateTime<Utc>) {
        self.posted_date = Some(now.format("%Y-%m-%d").to_string());
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_minimal_payload_parses() {
        let job: Job = serde_json::from_str(r#"{"title":"X","company":"Y"}"#).unwrap();
        assert_eq!(job.title, "X");
        assert_eq!(job.company, "Y");
        assert_eq!(job.id, 0);
        assert!(!job.remote);
        assert!(job.requirements.is_empty());
    }

    #[test]
    fn test_type_field_and_extras_round_trip() {
        let job: Job = serde_json::from_value(json!({
            "title": "Data Engineer",
            "type": "Contract",
            "postedDate": "2024-02-01",
            "benefits": ["dental"],
        }))
        .unwrap();
        assert_eq!(job.job_type, "Contract");
        assert_eq!(job.posted_date.as_deref(), Some("2024-02-01"));
        assert_eq!(job.extra["benefits"], json!(["dental"]));

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "Contract");
        assert_eq!(value["benefits"], json!(["dental"]));
        assert!(value.get("salary").is_none());
    }

    #[test]
    fn test_loosely_typed_fields_are_coerced() {
        let job: Job = serde_json::from_value(json!({
            "id": "tmp",
            "title": "Platform Engineer",
            "salary": 120000,
            "remote": "true",
            "requirements": null,
            "skills": "Rust",
            "createdAt": "not a date",
        }))
        .unwrap();

        assert_eq!(job.id, 0);
        assert_eq!(job.salary, Some(json!(120000)));
        assert!(job.remote);
        assert!(job.requirements.is_empty());
        assert_eq!(job.skills, vec!["Rust"]);
        assert!(job.created_at.is_none());
        assert!(serde_json::from_value::<Job>(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_salary_floor() {
        let samples = Job::samples();
        assert_eq!(samples[0].salary_floor(), Some(120_000));
        assert_eq!(samples[1].salary_floor(), Some(80_000));

        let numeric = Job { salary: Some(json!(95000)), ..Default::default() };
        assert_eq!(numeric.salary_floor(), Some(95_000));

        let vague = Job { salary: Some(json!("competitive")), ..Default::default() };
        assert_eq!(vague.salary_floor(), None);
        assert_eq!(Job::default().salary_floor(), None);
    }

    #[test]
    fn test_stamp_sets_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let mut job = Job::default();
        job.stamp(now);

        assert_eq!(job.posted_date.as_deref(), Some("2024-03-09"));
        assert_eq!(job.created_at, Some(now));
        assert_eq!(job.updated_at, Some(now));
    }

    #[test]
    fn test_scored_job_flattens() {
        let scored = ScoredJob {
            job: Job::samples().remove(0),
            score: Some(1.5),
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["score"], 1.5);
        assert_eq!(value["title"], "Senior Software Engineer");
    }
}
