//! Filter criteria derived from request query parameters
//!
//! A key that is absent (or empty) never constrains a search. The same
//! criteria drive both the search engine query and the in-memory fallback
//! scan, so the two paths agree on what a parameter means.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Job;

/// Inclusive salary bounds; either side may be open
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl SalaryRange {
    pub fn contains(&self, amount: u64) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// Named constraints applied to a job search or scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Free-text query; not echoed in `filters`, it is reported as `query`
    #[serde(skip)]
    pub q: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
}

impl FilterCriteria {
    /// Build criteria from raw query string parameters
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let get_number = |key: &str| get(key).and_then(|v| v.parse::<u64>().ok());

        let skills = get("skills")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|skills| !skills.is_empty());

        let salary_range = match (get_number("salaryMin"), get_number("salaryMax")) {
            (None, None) => None,
            (min, max) => Some(SalaryRange { min, max }),
        };

        Self {
            q: get("q"),
            location: get("location"),
            company: get("company"),
            job_type: get("type"),
            remote: get("remote").map(|v| v == "true"),
            skills,
            size: get_number("size").map(|n| n as usize),
            from: get_number("from").map(|n| n as usize),
            salary_range,
        }
    }

    /// Criteria for an unfiltered listing capped at `size` hits
    pub fn listing(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Free-text query, empty when absent
    pub fn text(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    /// True when anything beyond pagination narrows the result set
    pub fn has_constraints(&self) -> bool {
        self.q.is_some()
            || self.location.is_some()
            || self.company.is_some()
            || self.job_type.is_some()
            || self.remote.is_some()
            || self.skills.is_some()
            || self.salary_range.is_some()
    }

    /// In-memory match used when the search engine is unavailable.
    ///
    /// Text matches title, company, description or any requirement;
    /// location and company are substring matches; type and remote are exact.
    /// All text comparisons ignore case.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let hit = contains(&job.title, &needle)
                || contains(&job.company, &needle)
                || contains(&job.description, &needle)
                || job.requirements.iter().any(|r| contains(r, &needle));
            if !hit {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !contains(&job.location, &location.to_lowercase()) {
                return false;
            }
        }

        if let Some(company) = &self.company {
            if !contains(&job.company, &company.to_lowercase()) {
                return false;
            }
        }

        if let Some(job_type) = &self.job_type {
            if &job.job_type != job_type {
                return false;
            }
        }

        if let Some(remote) = self.remote {
            if job.remote != remote {
                return false;
            }
        }

        true
    }

    /// Skill and salary constraints, applied by the search engine only.
    ///
    /// A job needs at least one of the requested skills (exact match). A
    /// salary range requires a salary whose lower bound falls inside it.
    pub fn matches_skills_and_salary(&self, job: &Job) -> bool {
        if let Some(skills) = self.skills.as_ref().filter(|s| !s.is_empty()) {
            if !skills.iter().any(|wanted| job.skills.contains(wanted)) {
                return false;
            }
        }

        if let Some(range) = &self.salary_range {
            if !job.salary_floor().is_some_and(|amount| range.contains(amount)) {
                return false;
            }
        }

        true
    }
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_absent_and_empty_keys_do_not_constrain() {
        let criteria = FilterCriteria::from_query(&params(&[("q", ""), ("location", "  ")]));
        assert_eq!(criteria, FilterCriteria::default());
        assert!(!criteria.has_constraints());
    }

    #[test]
    fn test_parses_all_keys() {
        let criteria = FilterCriteria::from_query(&params(&[
            ("q", "rust"),
            ("location", "Remote"),
            ("company", "StartupXYZ"),
            ("type", "Full-time"),
            ("remote", "true"),
            ("skills", "React, CSS,,"),
            ("size", "5"),
            ("from", "10"),
            ("salaryMin", "80000"),
        ]));

        assert_eq!(criteria.text(), "rust");
        assert_eq!(criteria.remote, Some(true));
        assert_eq!(criteria.skills, Some(vec!["React".to_string(), "CSS".to_string()]));
        assert_eq!(criteria.size, Some(5));
        assert_eq!(criteria.from, Some(10));
        assert_eq!(
            criteria.salary_range,
            Some(SalaryRange { min: Some(80000), max: None })
        );
        assert!(criteria.has_constraints());
    }

    #[test]
    fn test_remote_coerces_non_true_to_false() {
        for value in ["false", "yes", "TRUE", "1"] {
            let criteria = FilterCriteria::from_query(&params(&[("remote", value)]));
            assert_eq!(criteria.remote, Some(false), "value {value}");
        }
    }

    #[test]
    fn test_pagination_alone_is_not_a_constraint() {
        let criteria = FilterCriteria::from_query(&params(&[("size", "3"), ("from", "abc")]));
        assert_eq!(criteria.size, Some(3));
        assert_eq!(criteria.from, None);
        assert!(!criteria.has_constraints());
    }

    #[test]
    fn test_serialized_filters_omit_absent_keys() {
        let criteria = FilterCriteria::from_query(&params(&[("q", "react"), ("remote", "true")]));
        assert_eq!(serde_json::to_value(&criteria).unwrap(), json!({ "remote": true }));
    }

    #[test]
    fn test_text_match_is_case_insensitive_and_covers_requirements() {
        let jobs = Job::samples();
        let criteria = FilterCriteria::from_query(&params(&[("q", "react")]));

        // "Frontend Developer" only mentions React in its requirements
        assert!(criteria.matches(&jobs[1]));
        assert!(criteria.matches(&jobs[0]));

        let criteria = FilterCriteria::from_query(&params(&[("q", "FRONTEND")]));
        assert!(criteria.matches(&jobs[1]));
        assert!(!criteria.matches(&jobs[0]));
    }

    #[test]
    fn test_skills_and_salary_constraints() {
        let jobs = Job::samples();

        let css = FilterCriteria::from_query(&params(&[("skills", "CSS,Go")]));
        assert!(!css.matches_skills_and_salary(&jobs[0]));
        assert!(css.matches_skills_and_salary(&jobs[1]));

        let senior_pay = FilterCriteria::from_query(&params(&[("salaryMin", "100000")]));
        assert!(senior_pay.matches_skills_and_salary(&jobs[0]));
        assert!(!senior_pay.matches_skills_and_salary(&jobs[1]));

        let capped = FilterCriteria::from_query(&params(&[("salaryMax", "90000")]));
        assert!(!capped.matches_skills_and_salary(&jobs[0]));
        assert!(capped.matches_skills_and_salary(&jobs[1]));
        assert!(!capped.matches_skills_and_salary(&Job::default()));

        // The fallback scan ignores both
        assert!(css.matches(&jobs[0]));
        assert!(senior_pay.matches(&jobs[1]));
    }

    #[test]
    fn test_remote_filter() {
        let jobs = Job::samples();

        let remote_only = FilterCriteria::from_query(&params(&[("remote", "true")]));
        let matched: Vec<_> = jobs.iter().filter(|j| remote_only.matches(j)).collect();
        assert_eq!(matched.len(), 1);
        assert!(matched[0].remote);

        let on_site = FilterCriteria::from_query(&params(&[("remote", "nope")]));
        let matched: Vec<_> = jobs.iter().filter(|j| on_site.matches(j)).collect();
        assert_eq!(matched.len(), 1);
        assert!(!matched[0].remote);
    }

    #[test]
    fn test_type_is_exact_and_location_is_substring() {
        let jobs = Job::samples();

        let criteria = FilterCriteria::from_query(&params(&[("type", "full-time")]));
        assert!(!criteria.matches(&jobs[0]));

        let criteria = FilterCriteria::from_query(&params(&[("type", "Full-time"), ("location", "san fran")]));
        assert!(criteria.matches(&jobs[0]));
        assert!(!criteria.matches(&jobs[1]));
    }
}
