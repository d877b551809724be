//! Search engine request payloads
//!
//! Pure builders for the query, aggregation and index-schema bodies so the
//! exact shape sent to the engine can be tested without a cluster.

use jobboard_common::filters::SalaryRange;
use jobboard_common::FilterCriteria;
use serde_json::{json, Map, Value};

/// Page size when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Fields searched by free text, with relevance boosts
pub const TEXT_FIELDS: &[&str] = &["title^3", "company^2", "description", "requirements", "skills"];

/// Build the `_search` body for a text query plus filters.
///
/// Text becomes a fuzzy multi-field `must` clause (omitted when empty, which
/// matches everything). Filters go into the non-scoring `filter` context.
/// Results sort by posting date first, then by relevance. Totals are
/// exact, not capped at the engine's default of 10,000.
pub fn search_body(text: &str, filters: &FilterCriteria) -> Value {
    let mut must = Vec::new();
    let text = text.trim();
    if !text.is_empty() {
        must.push(json!({
            "multi_match": {
                "query": text,
                "fields": TEXT_FIELDS,
                "type": "best_fields",
                "fuzziness": "AUTO"
            }
        }));
    }

    json!({
        "query": {
            "bool": {
                "must": must,
                "filter": filter_clauses(filters)
            }
        },
        "sort": [
            { "postedDate": { "order": "desc" } },
            { "_score": { "order": "desc" } }
        ],
        "size": filters.size.unwrap_or(DEFAULT_PAGE_SIZE),
        "from": filters.from.unwrap_or(0),
        "track_total_hits": true
    })
}

fn filter_clauses(filters: &FilterCriteria) -> Vec<Value> {
    let mut clauses = Vec::new();

    if let Some(location) = &filters.location {
        clauses.push(json!({ "term": { "location.keyword": location } }));
    }
    if let Some(company) = &filters.company {
        clauses.push(json!({ "term": { "company.keyword": company } }));
    }
    if let Some(job_type) = &filters.job_type {
        clauses.push(json!({ "term": { "type": job_type } }));
    }
    if let Some(remote) = filters.remote {
        clauses.push(json!({ "term": { "remote": remote } }));
    }
    if let Some(skills) = filters.skills.as_ref().filter(|s| !s.is_empty()) {
        clauses.push(json!({ "terms": { "skills": skills } }));
    }
    if let Some(range) = &filters.salary_range {
        clauses.push(salary_clause(range));
    }

    clauses
}

fn salary_clause(range: &SalaryRange) -> Value {
    let mut bounds = Map::new();
    if let Some(min) = range.min {
        bounds.insert("gte".to_string(), json!(min));
    }
    if let Some(max) = range.max {
        bounds.insert("lte".to_string(), json!(max));
    }
    json!({ "range": { "salary": bounds } })
}

/// Aggregation-only `_search` body
pub fn aggregations_body() -> Value {
    json!({
        "size": 0,
        "aggs": {
            "companies": { "terms": { "field": "company.keyword", "size": 20 } },
            "locations": { "terms": { "field": "location.keyword", "size": 20 } },
            "job_types": { "terms": { "field": "type", "size": 10 } },
            "skills": { "terms": { "field": "skills", "size": 30 } },
            "remote_jobs": { "terms": { "field": "remote" } }
        }
    })
}

/// Index settings and mappings for job documents
pub fn index_schema() -> Value {
    let text_with_keyword = |analyzer: &str| {
        json!({
            "type": "text",
            "analyzer": analyzer,
            "fields": { "keyword": { "type": "keyword" } }
        })
    };

    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "title": text_with_keyword("english"),
                "company": text_with_keyword("standard"),
                "location": text_with_keyword("standard"),
                "description": { "type": "text", "analyzer": "english" },
                "salary": { "type": "keyword" },
                "type": { "type": "keyword" },
                "postedDate": { "type": "date" },
                "requirements": { "type": "keyword" },
                "skills": { "type": "keyword" },
                "experience": { "type": "keyword" },
                "remote": { "type": "boolean" },
                "createdAt": { "type": "date" },
                "updatedAt": { "type": "date" }
            }
        },
        "settings": {
            "analysis": {
                "analyzer": {
                    "custom_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "stop", "snowball"]
                    }
                }
            }
        }
    })
}
