//! Route table with compiled path templates
//!
//! Routes are keyed as `"METHOD /path"`. A template may contain whole
//! `{name}` segments, each matching exactly one path segment.
//!
//! Resolution order:
//! 1. Exact key lookup
//! 2. Parameterized templates in registration order; the first match wins
//!
//! Method and path comparison are both case-sensitive.

use jobboard_common::errors::{AppError, Result};
use regex_lite::Regex;
use std::collections::HashMap;

/// A compiled parameterized template
struct PathMatcher {
    method: String,
    pattern: Regex,
    params: Vec<String>,
    slot: usize,
}

/// A successful lookup
#[derive(Debug, PartialEq)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    /// Registered key, e.g. `GET /companies/{id}`
    pub key: &'a str,
    pub params: HashMap<String, String>,
}

/// Maps method + path templates to handlers
pub struct RouteTable<H> {
    entries: Vec<(String, H)>,
    exact: HashMap<String, usize>,
    matchers: Vec<PathMatcher>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            exact: HashMap::new(),
            matchers: Vec::new(),
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Re-registering a key is rejected.
    pub fn route(&mut self, method: &str, template: &str, handler: H) -> Result<&mut Self> {
        let key = route_key(method, template);
        if self.entries.iter().any(|(existing, _)| *existing == key) {
            return Err(AppError::Configuration {
                message: format!("Route registered twice: {}", key),
            });
        }

        let slot = self.entries.len();
        match compile_template(template)? {
            Some((pattern, params)) => self.matchers.push(PathMatcher {
                method: method.to_string(),
                pattern,
                params,
                slot,
            }),
            None => {
                self.exact.insert(key.clone(), slot);
            }
        }

        self.entries.push((key, handler));
        Ok(self)
    }

    /// Find the handler for a request
    pub fn resolve(&self, method: &str, path: &str) -> Result<RouteMatch<'_, H>> {
        if let Some(&slot) = self.exact.get(&route_key(method, path)) {
            let (key, handler) = &self.entries[slot];
            return Ok(RouteMatch {
                handler,
                key,
                params: HashMap::new(),
            });
        }

        for matcher in self.matchers.iter().filter(|m| m.method == method) {
            let Some(captures) = matcher.pattern.captures(path) else {
                continue;
            };

            let params = matcher
                .params
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, value)| value.map(|v| (name.clone(), v.as_str().to_string())))
                .collect();

            let (key, handler) = &self.entries[matcher.slot];
            return Ok(RouteMatch { handler, key, params });
        }

        Err(AppError::RouteNotFound {
            method: method.to_string(),
            path: path.to_string(),
            available_endpoints: self.keys(),
        })
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method, path)
}

/// Compile a template into an anchored pattern.
///
/// Returns `None` for templates without placeholders, which only ever
/// match exactly.
fn compile_template(template: &str) -> Result<Option<(Regex, Vec<String>)>> {
    let mut params = Vec::new();
    let segments: Vec<String> = template
        .split('/')
        .map(|segment| match placeholder(segment) {
            Some(name) => {
                params.push(name.to_string());
                "([^/]+)".to_string()
            }
            None => regex_lite::escape(segment),
        })
        .collect();

    if params.is_empty() {
        return Ok(None);
    }

    let pattern = Regex::new(&format!("^{}$", segments.join("/"))).map_err(|e| {
        AppError::Configuration {
            message: format!("Invalid route template {}: {}", template, e),
        }
    })?;

    Ok(Some((pattern, params)))
}

fn placeholder(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|name| !name.is_empty() && !name.contains(['{', '}']))
}
