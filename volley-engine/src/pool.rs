//! Request materialization and the request-source abstraction

use crate::error::{EngineError, EngineResult};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use url::Url;
use volley_core::{Job, Seed, SeedBody};
use volley_http::{HttpError, HttpMethod};

/// One fully-resolved request, ready to hand to a transport client
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Capability to supply the next request to fire
///
/// Drivers only ever ask for "the next request". Whether it comes from a
/// randomized pool or an externally supplied target list is the
/// implementor's business.
pub trait RequestSource: Send + Sync {
    fn draw(&self) -> ResolvedRequest;
}

/// The hosts x seeds cross-product of a job, materialized once per run
///
/// Read-only for the duration of the run; `draw` picks uniformly at random.
#[derive(Debug)]
pub struct RequestPool {
    requests: Vec<ResolvedRequest>,
}

impl RequestPool {
    /// Materialize the pool from a job definition
    ///
    /// Emptiness is validated here, not at draw time: a run whose pool would
    /// be empty never starts.
    pub fn build(job: &Job) -> EngineResult<Self> {
        let mut requests = Vec::with_capacity(job.hosts.len() * job.seeds.len());
        for host in &job.hosts {
            for seed in &job.seeds {
                requests.push(resolve(job.method, host, &job.url, seed)?);
            }
        }
        if requests.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        debug!(size = requests.len(), "request pool materialized");
        Ok(Self { requests })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl RequestSource for RequestPool {
    fn draw(&self) -> ResolvedRequest {
        let index = rand::thread_rng().gen_range(0..self.requests.len());
        self.requests[index].clone()
    }
}

/// An externally supplied target list, served round-robin
#[derive(Debug)]
pub struct StaticTargets {
    targets: Vec<ResolvedRequest>,
    cursor: AtomicUsize,
}

impl StaticTargets {
    pub fn new(targets: Vec<ResolvedRequest>) -> EngineResult<Self> {
        if targets.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        Ok(Self {
            targets,
            cursor: AtomicUsize::new(0),
        })
    }
}

impl RequestSource for StaticTargets {
    fn draw(&self) -> ResolvedRequest {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.targets.len();
        self.targets[index].clone()
    }
}

fn resolve(method: HttpMethod, host: &str, path: &str, seed: &Seed) -> EngineResult<ResolvedRequest> {
    Ok(ResolvedRequest {
        method,
        url: resolve_url(host, path, &seed.params)?,
        headers: resolve_headers(seed)?,
        body: resolve_body(&seed.body),
    })
}

/// Join host and path into a URL and merge the seed's query parameters into
/// any query string already on the path. Seed parameters are additive: on a
/// key collision both values are retained.
fn resolve_url(
    host: &str,
    path: &str,
    params: &std::collections::HashMap<String, JsonValue>,
) -> EngineResult<Url> {
    let base = if host.contains("://") {
        format!("{}{}", host, path)
    } else {
        format!("http://{}{}", host, path)
    };
    let mut url =
        Url::parse(&base).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base, e)))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            match value {
                JsonValue::Array(items) => {
                    for item in items {
                        pairs.append_pair(key, &scalar_to_string(item));
                    }
                }
                other => {
                    pairs.append_pair(key, &scalar_to_string(other));
                }
            }
        }
    }
    Ok(url)
}

/// Expand seed header entries into a header map. A scalar value produces one
/// occurrence; a list value produces one occurrence per element, preserving
/// the list's order.
fn resolve_headers(seed: &Seed) -> EngineResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in &seed.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| HttpError::InvalidHeaderName(key.clone()))?;
        match value {
            JsonValue::Array(items) => {
                for item in items {
                    headers.append(name.clone(), header_value(key, item)?);
                }
            }
            other => {
                headers.append(name, header_value(key, other)?);
            }
        }
    }
    Ok(headers)
}

fn header_value(key: &str, value: &JsonValue) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(&scalar_to_string(value))
        .map_err(|_| HttpError::InvalidHeaderValue(key.to_string()))
}

fn resolve_body(body: &SeedBody) -> Vec<u8> {
    match body {
        SeedBody::Raw(payload) => payload.clone().into_bytes(),
        SeedBody::Form(data) => {
            let mut encoder = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in data {
                encoder.append_pair(key, &scalar_to_string(value));
            }
            encoder.finish().into_bytes()
        }
    }
}

/// Render a JSON scalar the way it appears on the wire: strings unquoted,
/// everything else via its JSON rendering.
fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use volley_core::Job;

    fn job_with(hosts: &[&str], seeds: Vec<Seed>) -> Job {
        let mut job = Job::new("pool-test");
        job.url = "/api/ping".to_string();
        job.hosts = hosts.iter().map(|h| h.to_string()).collect();
        job.seeds = seeds;
        job
    }

    #[test]
    fn test_pool_size_is_hosts_times_seeds() {
        let job = job_with(
            &["a:8000", "b:8000"],
            vec![Seed::default(), Seed::default(), Seed::default()],
        );
        let pool = RequestPool::build(&job).unwrap();
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_draw_returns_pool_member() {
        let job = job_with(&["a:8000", "b:8000"], vec![Seed::default()]);
        let pool = RequestPool::build(&job).unwrap();
        let allowed = ["http://a:8000/api/ping", "http://b:8000/api/ping"];
        for _ in 0..50 {
            let request = pool.draw();
            assert!(allowed.contains(&request.url.as_str()));
        }
    }

    #[test]
    fn test_empty_cross_product_rejected() {
        let job = job_with(&[], vec![Seed::default()]);
        assert!(matches!(
            RequestPool::build(&job),
            Err(EngineError::EmptyPool)
        ));
    }

    #[test]
    fn test_query_merge_is_additive() {
        let mut params = HashMap::new();
        params.insert("q".to_string(), json!("extra"));
        let url = resolve_url("a:8000", "/search?q=base&lang=en", &params).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "base".to_string())));
        assert!(pairs.contains(&("q".to_string(), "extra".to_string())));
        assert!(pairs.contains(&("lang".to_string(), "en".to_string())));
    }

    #[test]
    fn test_list_header_expands_in_order() {
        let mut seed = Seed::default();
        seed.headers
            .insert("x-trace".to_string(), json!(["one", "two"]));
        seed.headers.insert("host".to_string(), json!("api.test"));
        let headers = resolve_headers(&seed).unwrap();
        let traces: Vec<_> = headers.get_all("x-trace").iter().collect();
        assert_eq!(traces, vec!["one", "two"]);
        assert_eq!(headers.get("host").unwrap(), "api.test");
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let mut seed = Seed::default();
        seed.headers.insert("bad header".to_string(), json!("v"));
        assert!(resolve_headers(&seed).is_err());
    }

    #[test]
    fn test_raw_body_passed_through() {
        let body = resolve_body(&SeedBody::Raw("{\"k\":1}".to_string()));
        assert_eq!(body, b"{\"k\":1}");
    }

    #[test]
    fn test_form_body_encodes_pairs() {
        let mut data = HashMap::new();
        data.insert("name".to_string(), json!("a b"));
        data.insert("count".to_string(), json!(3));
        let body = String::from_utf8(resolve_body(&SeedBody::Form(data))).unwrap();
        // Key order across the map is unspecified; check the pairs.
        let mut pairs: Vec<_> = body.split('&').collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec!["count=3", "name=a+b"]);
    }

    #[test]
    fn test_static_targets_round_robin() {
        let job = job_with(&["a:8000", "b:8000"], vec![Seed::default()]);
        let pool = RequestPool::build(&job).unwrap();
        let targets = StaticTargets::new(vec![pool.draw(), pool.draw(), pool.draw()]).unwrap();
        let first = targets.draw().url;
        targets.draw();
        targets.draw();
        assert_eq!(targets.draw().url, first);
    }

    #[test]
    fn test_static_targets_reject_empty() {
        assert!(matches!(
            StaticTargets::new(Vec::new()),
            Err(EngineError::EmptyPool)
        ));
    }
}
