use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use super::types::CanonicalData;

pub const PROBLEM_SPECIFICATIONS_RAW: &str =
    "https://raw.githubusercontent.com/exercism/problem-specifications/master/exercises";

#[derive(Clone)]
pub struct SpecClient {
    client: Client,
    base_url: String,
}

impl SpecClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn canonical_data_url(&self, exercise: &str) -> String {
        canonical_data_url(&self.base_url, exercise)
    }

    /// `Ok(None)` when the document does not exist or the repository cannot
    /// be reached. `Err` only when a document came back but is not valid
    /// canonical data.
    pub async fn fetch_canonical_data(&self, exercise: &str) -> Result<Option<CanonicalData>> {
        let url = self.canonical_data_url(exercise);
        debug!(%url, "fetching canonical data");

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "could not reach the problem specifications");
                return Ok(None);
            }
        };

        if !resp.status().is_success() {
            debug!(status = %resp.status(), "no canonical data available");
            return Ok(None);
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "canonical data download was interrupted");
                return Ok(None);
            }
        };

        parse_canonical_data(&body)
            .with_context(|| format!("Malformed canonical data at {url}"))
            .map(Some)
    }
}

pub fn canonical_data_url(base_url: &str, exercise: &str) -> String {
    format!(
        "{}/{}/canonical-data.json",
        base_url.trim_end_matches('/'),
        exercise
    )
}

pub fn parse_canonical_data(body: &str) -> Result<CanonicalData> {
    serde_json::from_str(body).context("Failed to parse canonical data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_layout() {
        assert_eq!(
            canonical_data_url(PROBLEM_SPECIFICATIONS_RAW, "two-fer"),
            "https://raw.githubusercontent.com/exercism/problem-specifications/master/exercises/two-fer/canonical-data.json"
        );
        assert_eq!(
            canonical_data_url("http://localhost:8080/specs/", "leap"),
            "http://localhost:8080/specs/leap/canonical-data.json"
        );
    }

    #[test]
    fn client_normalizes_base_url() {
        let client = SpecClient::new("http://localhost/specs//").unwrap();
        assert_eq!(
            client.canonical_data_url("grep"),
            "http://localhost/specs/grep/canonical-data.json"
        );
    }

    #[test]
    fn parses_documents() {
        let data = parse_canonical_data(
            r#"{"exercise": "leap", "version": "1.4.0", "cases": [
                {"description": "year not divisible by 4", "property": "leapYear", "input": {"year": 2015}, "expected": false}
            ]}"#,
        )
        .unwrap();
        assert_eq!(data.version.as_deref(), Some("1.4.0"));
        assert_eq!(data.cases.len(), 1);
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(parse_canonical_data("{not json").is_err());
        assert!(parse_canonical_data(r#"{"exercise": "leap"}"#).is_err());
    }
}
