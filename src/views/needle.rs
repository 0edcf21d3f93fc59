//! Needle comparison view: the leaderboard row contract framed around
//! the two headline datasets.

use url::Url;

use crate::model::{BenchmarkRun, SiteMeta};

/// A dataset reference card. `href` is set only for real web URLs; a
/// plain path gets a disabled self-link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub path: String,
    pub href: Option<String>,
}

impl DatasetRef {
    pub fn resolve(path: &str) -> Self {
        let external = Url::parse(path)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        Self {
            path: path.to_string(),
            href: external.then(|| path.to_string()),
        }
    }
}

/// Headline dataset paths: manifest meta first, then the first run's
/// corresponding eval dataset, then a placeholder.
pub fn headline_datasets(meta: &SiteMeta, runs: &[BenchmarkRun]) -> (DatasetRef, DatasetRef) {
    let coverage = meta
        .coverage_dataset
        .clone()
        .or_else(|| {
            runs.first()
                .and_then(|r| r.intent_eval.as_ref())
                .and_then(|i| i.dataset.clone())
        })
        .unwrap_or_else(|| "-".to_string());
    let needle = meta
        .needle_dataset
        .clone()
        .or_else(|| {
            runs.first()
                .and_then(|r| r.needle_eval.as_ref())
                .and_then(|n| n.dataset.clone())
        })
        .unwrap_or_else(|| "-".to_string());
    (DatasetRef::resolve(&coverage), DatasetRef::resolve(&needle))
}
