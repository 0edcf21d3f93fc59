//! Data loading: HTTP fetches, local file reads, and JSONL parsing.
//!
//! JSONL parsing degrades gracefully: a malformed line is logged and
//! dropped, never failing the batch. Order of valid records is preserved.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::logging::{obj, v_num, v_str, warn, Domain};

/// Non-success HTTP response, carrying enough to diagnose the failed URL.
#[derive(Debug)]
pub struct FetchError {
    pub url: String,
    pub status: u16,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to fetch {}: status {}", self.url, self.status)
    }
}

impl std::error::Error for FetchError {}

/// GET a URL and parse the body as JSON. Non-success status is a
/// `FetchError`; transport errors propagate with URL context.
pub async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    let text = fetch_text(client, url).await?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON from {}", url))
}

/// GET a URL and return the body as text, failing on non-success status.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    resp.text()
        .await
        .with_context(|| format!("reading body from {} failed", url))
}

/// Read a local file fully as text.
pub fn read_file_as_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Parse line-delimited JSON. Lines are split on `\n` with trailing `\r`
/// tolerated; blank lines are skipped; a line that fails to parse is
/// warned about (with its 1-based line number) and excluded.
pub fn parse_jsonl<T: DeserializeOwned>(text: &str) -> Vec<T> {
    let mut records = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(err) => warn(
                Domain::Fetch,
                "bad_jsonl_line",
                obj(&[
                    ("line", v_num((idx + 1) as f64)),
                    ("error", v_str(&err.to_string())),
                ]),
            ),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TxSummary;
    use serde_json::json;

    #[test]
    fn parse_jsonl_drops_malformed_lines_and_keeps_order() {
        let text = "{\"a\":1}\n{not json}\n{\"a\":2}\n\n{\"a\":3}";
        let records: Vec<Value> = parse_jsonl(text);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["a"], json!(1));
        assert_eq!(records[1]["a"], json!(2));
        assert_eq!(records[2]["a"], json!(3));
    }

    #[test]
    fn parse_jsonl_handles_crlf_endings() {
        let text = "{\"digest\":\"d1\"}\r\n{\"digest\":\"d2\"}\r\n";
        let records: Vec<TxSummary> = parse_jsonl(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key(), "d2");
    }

    #[test]
    fn parse_jsonl_empty_input_is_empty() {
        let records: Vec<Value> = parse_jsonl("");
        assert!(records.is_empty());
        let records: Vec<Value> = parse_jsonl("\n\n\r\n");
        assert!(records.is_empty());
    }

    #[test]
    fn fetch_error_displays_url_and_status() {
        let err = FetchError {
            url: "https://bench.example/models.json".to_string(),
            status: 404,
        };
        let msg = err.to_string();
        assert!(msg.contains("models.json"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn read_file_as_text_reports_path() {
        let err = read_file_as_text(Path::new("/nonexistent/x.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/x.json"));
    }
}
