//! HTTP access to the benchmark feeds and the commits API

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use wfb_core::parser::{normalize_json, parse_markdown, NormalizeOptions};
use wfb_core::revision::{self, Revision};
use wfb_core::{BenchmarkData, LegacyBenchmark};

/// Where each feed is served from
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub data_host: String,
    pub history_host: String,
    pub readme_host: String,
}

impl Endpoints {
    pub fn data_url(&self, sha: &str) -> Result<Url> {
        Ok(Url::parse(&revision::data_url(&self.data_host, sha))?)
    }

    pub fn readme_url(&self, sha: &str) -> Result<Url> {
        Ok(Url::parse(&revision::readme_url(&self.readme_host, sha))?)
    }

    pub fn commits_url(&self, limit: usize) -> Result<Url> {
        let mut url = Url::parse(&revision::commits_url(&self.history_host))?;
        url.query_pairs_mut()
            .append_pair("per_page", &limit.to_string());
        Ok(url)
    }
}

/// Blocking client for the feeds
pub struct FeedClient {
    client: reqwest::blocking::Client,
    token: Option<String>,
    endpoints: Endpoints,
}

impl FeedClient {
    pub fn new(endpoints: Endpoints, timeout: Duration, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("wfb"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            token,
            endpoints,
        })
    }

    fn get_text(&self, url: Url, headers: HeaderMap) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).headers(headers).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }

    /// Download and normalize the JSON feed of one revision
    pub fn fetch_data(&self, sha: &str, options: &NormalizeOptions) -> Result<BenchmarkData> {
        info!("Loading results for revision {}", sha);
        let body = self.get_text(self.endpoints.data_url(sha)?, HeaderMap::new())?;
        let data = normalize_json(&body, options)?;
        info!("Loaded {} frameworks", data.benchmarks.len());
        Ok(data)
    }

    /// Download and parse the legacy README table
    pub fn fetch_readme(&self, sha: &str) -> Result<Vec<LegacyBenchmark>> {
        info!("Loading legacy results for revision {}", sha);
        let body = self.get_text(self.endpoints.readme_url(sha)?, HeaderMap::new())?;
        Ok(parse_markdown(&body)?)
    }

    /// Revisions of the data file, `master` first
    pub fn fetch_revisions(&self, limit: usize) -> Result<Vec<Revision>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        if let Some(ref t) = self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", t))
                    .map_err(|_| Error::Header("Invalid token format".to_string()))?,
            );
        }

        let body = self.get_text(self.endpoints.commits_url(limit)?, headers)?;
        Ok(revision::parse_revisions(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints {
            data_host: "https://raw.example.com/bench/".to_string(),
            history_host: "https://api.example.com/repos/bench".to_string(),
            readme_host: "https://raw.example.com/bench".to_string(),
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let endpoints = endpoints();

        assert_eq!(
            endpoints.data_url("0a1b2c3").unwrap().as_str(),
            "https://raw.example.com/bench/0a1b2c3/data.min.json"
        );
        assert_eq!(
            endpoints.readme_url("master").unwrap().as_str(),
            "https://raw.example.com/bench/master/README.md"
        );
        assert_eq!(
            endpoints.commits_url(10).unwrap().as_str(),
            "https://api.example.com/repos/bench/commits?path=data.min.json&per_page=10"
        );
    }

    #[test]
    fn test_invalid_host() {
        let endpoints = Endpoints {
            data_host: "not a url".to_string(),
            ..endpoints()
        };

        assert!(matches!(endpoints.data_url("master"), Err(Error::Url(_))));
    }

    #[test]
    fn test_client_builds_with_token() {
        let client = FeedClient::new(endpoints(), Duration::from_secs(5), Some("abc".to_string()));
        assert!(client.is_ok());
    }
}
