//! In-process gateway for tests and local development
//!
//! Holds indexed documents in memory and can be switched into an
//! unavailable state to exercise fallback paths.

use async_trait::async_trait;
use chrono::Utc;
use jobboard_common::{FilterCriteria, Job, ScoredJob};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{GatewayResult, SearchUnavailable};
use crate::query::DEFAULT_PAGE_SIZE;
use crate::types::{ClusterHealth, SearchResults};
use crate::SearchGateway;

/// Search gateway that never leaves the process
#[derive(Debug)]
pub struct MockGateway {
    available: AtomicBool,
    documents: Mutex<Vec<Job>>,
    index_calls: AtomicUsize,
}

impl MockGateway {
    /// An empty, reachable engine
    pub fn available() -> Self {
        Self::with_documents(Vec::new())
    }

    /// An engine that fails every call
    pub fn unavailable() -> Self {
        let gateway = Self::available();
        gateway.set_available(false);
        gateway
    }

    /// A reachable engine pre-loaded with documents
    pub fn with_documents(documents: Vec<Job>) -> Self {
        Self {
            available: AtomicBool::new(true),
            documents: Mutex::new(documents),
            index_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of every indexed document
    pub fn indexed(&self) -> Vec<Job> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `index` calls received, successful or not
    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &'static str) -> GatewayResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchUnavailable::new(operation, "connection refused"))
        }
    }
}

#[async_trait]
impl SearchGateway for MockGateway {
    async fn ensure_index(&self) -> GatewayResult<()> {
        self.check("ensure_index")
    }

    async fn search(&self, text: &str, filters: &FilterCriteria) -> GatewayResult<SearchResults> {
        self.check("search")?;

        let mut criteria = filters.clone();
        let text = text.trim();
        criteria.q = (!text.is_empty()).then(|| text.to_string());

        let mut matched: Vec<Job> = self
            .indexed()
            .into_iter()
            .filter(|job| criteria.matches(job) && criteria.matches_skills_and_salary(job))
            .collect();
        matched.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(filters.from.unwrap_or(0))
            .take(filters.size.unwrap_or(DEFAULT_PAGE_SIZE))
            .map(|job| ScoredJob {
                job,
                score: Some(1.0),
            })
            .collect();

        Ok(SearchResults {
            hits,
            total,
            aggregations: None,
        })
    }

    async fn index(&self, job: &Job) -> GatewayResult<Job> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        self.check("index")?;

        let mut document = job.clone();
        document.updated_at = Some(Utc::now());

        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        documents.retain(|existing| existing.id != document.id);
        documents.push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: u64, partial: Value) -> GatewayResult<Value> {
        self.check("update")?;

        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        let position = documents
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| SearchUnavailable::new("update", format!("document {} not found", id)))?;

        let mut merged = serde_json::to_value(&documents[position])
            .map_err(|e| SearchUnavailable::new("update", e))?;
        if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), partial.clone()) {
            target.extend(fields);
            target.insert("updatedAt".to_string(), json!(Utc::now()));
        }
        documents[position] =
            serde_json::from_value(merged).map_err(|e| SearchUnavailable::new("update", e))?;

        Ok(partial)
    }

    async fn delete(&self, id: u64) -> GatewayResult<()> {
        self.check("delete")?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|job| job.id != id);
        Ok(())
    }

    async fn aggregate(&self) -> GatewayResult<Value> {
        self.check("aggregate")?;

        let documents = self.indexed();
        let buckets = |values: Vec<String>| {
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for value in values {
                *counts.entry(value).or_default() += 1;
            }
            let buckets: Vec<Value> = counts
                .into_iter()
                .map(|(key, doc_count)| json!({ "key": key, "doc_count": doc_count }))
                .collect();
            json!({ "buckets": buckets })
        };

        Ok(json!({
            "companies": buckets(documents.iter().map(|j| j.company.clone()).collect()),
            "locations": buckets(documents.iter().map(|j| j.location.clone()).collect()),
            "job_types": buckets(documents.iter().map(|j| j.job_type.clone()).collect()),
            "skills": buckets(documents.iter().flat_map(|j| j.skills.clone()).collect()),
            "remote_jobs": buckets(documents.iter().map(|j| j.remote.to_string()).collect()),
        }))
    }

    async fn health_check(&self) -> GatewayResult<ClusterHealth> {
        self.check("health_check")?;
        Ok(ClusterHealth {
            status: "green".to_string(),
            number_of_nodes: 1,
            active_shards: 1,
            relocating_shards: 0,
            initializing_shards: 0,
            unassigned_shards: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_common::filters::SalaryRange;

    #[tokio::test]
    async fn test_search_paginates_newest_first() {
        let gateway = MockGateway::with_documents(Job::samples());

        let filters = FilterCriteria {
            size: Some(1),
            ..Default::default()
        };
        let page = gateway.search("", &filters).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].job.posted_date.as_deref(), Some("2024-01-15"));

        let filters = FilterCriteria {
            size: Some(1),
            from: Some(1),
            ..Default::default()
        };
        let page = gateway.search("", &filters).await.unwrap();
        assert_eq!(page.hits[0].job.id, 2);
    }

    #[tokio::test]
    async fn test_search_applies_text_and_filters() {
        let gateway = MockGateway::with_documents(Job::samples());

        let results = gateway.search("frontend", &FilterCriteria::default()).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].job.title, "Frontend Developer");

        let filters = FilterCriteria {
            remote: Some(false),
            ..Default::default()
        };
        let results = gateway.search("react", &filters).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].job.company, "Tech Corp");
    }

    #[tokio::test]
    async fn test_search_applies_skills_and_salary() {
        let gateway = MockGateway::with_documents(Job::samples());

        let filters = FilterCriteria {
            skills: Some(vec!["CSS".to_string()]),
            ..Default::default()
        };
        let results = gateway.search("", &filters).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].job.title, "Frontend Developer");

        let filters = FilterCriteria {
            salary_range: Some(SalaryRange { min: Some(100_000), max: None }),
            ..Default::default()
        };
        let results = gateway.search("", &filters).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].job.company, "Tech Corp");

        let filters = FilterCriteria {
            skills: Some(vec!["CSS".to_string()]),
            salary_range: Some(SalaryRange { min: Some(100_000), max: None }),
            ..Default::default()
        };
        assert_eq!(gateway.search("", &filters).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let gateway = MockGateway::unavailable();

        assert!(gateway.ensure_index().await.is_err());
        assert!(gateway.search("", &FilterCriteria::default()).await.is_err());
        assert!(gateway.index(&Job::default()).await.is_err());
        assert!(gateway.aggregate().await.is_err());
        assert!(gateway.health_check().await.is_err());
        assert_eq!(gateway.index_calls(), 1);
        assert!(gateway.indexed().is_empty());
    }

    #[tokio::test]
    async fn test_index_replaces_by_id_and_update_merges() {
        let gateway = MockGateway::available();
        let mut job = Job::samples().remove(0);

        gateway.index(&job).await.unwrap();
        job.title = "Staff Engineer".to_string();
        gateway.index(&job).await.unwrap();
        assert_eq!(gateway.indexed().len(), 1);

        gateway.update(job.id, json!({ "salary": "$200,000" })).await.unwrap();
        let stored = &gateway.indexed()[0];
        assert_eq!(stored.title, "Staff Engineer");
        assert_eq!(stored.salary, Some(json!("$200,000")));

        gateway.delete(job.id).await.unwrap();
        assert!(gateway.indexed().is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_counts_terms() {
        let gateway = MockGateway::with_documents(Job::samples());
        let aggregations = gateway.aggregate().await.unwrap();

        assert_eq!(
            aggregations["job_types"]["buckets"],
            json!([{ "key": "Full-time", "doc_count": 2 }])
        );
        let skills = aggregations["skills"]["buckets"].as_array().unwrap();
        assert!(skills.contains(&json!({ "key": "React", "doc_count": 2 })));
    }
}
