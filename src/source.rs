//! Artifact sources and per-run loading.
//!
//! The hosted site layout and a local data checkout expose the same
//! relative file structure, so both sit behind `ArtifactSource`. A local
//! bundle (user-supplied directory of run files matched by basename) is a
//! third path with stricter up-front validation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::future::{join3, try_join};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::fetch::{fetch_json, fetch_text, parse_jsonl, read_file_as_text};
use crate::logging::{info, obj, v_num, v_str, Domain};
use crate::model::{EvalScore, NeedleEval, RunMeta, TxSummary};

pub const EVAL_PER_TX: &str = "eval_per_tx.jsonl";
pub const PER_TX: &str = "per_tx.jsonl";
pub const EVAL_SCORE: &str = "eval_score.json";
pub const META: &str = "meta.json";
pub const EVAL_NEEDLE: &str = "eval_needle.json";

/// Read access to site data addressed by path relative to the data root.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn text(&self, rel: &str) -> Result<String>;
    async fn json(&self, rel: &str) -> Result<Value>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    client: Client,
    base: String,
}

impl HttpSource {
    pub fn new(client: Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, rel: &str) -> String {
        format!("{}/{}", self.base, rel.trim_start_matches('/'))
    }
}

#[async_trait]
impl ArtifactSource for HttpSource {
    async fn text(&self, rel: &str) -> Result<String> {
        fetch_text(&self.client, &self.url(rel)).await
    }

    async fn json(&self, rel: &str) -> Result<Value> {
        fetch_json(&self.client, &self.url(rel)).await
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}

pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactSource for FsSource {
    async fn text(&self, rel: &str) -> Result<String> {
        read_file_as_text(&self.root.join(rel))
    }

    async fn json(&self, rel: &str) -> Result<Value> {
        let path = self.root.join(rel);
        let text = read_file_as_text(&path)?;
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Everything loaded for one run, ready for the trajectory view.
#[derive(Debug, Clone, Default)]
pub struct RunData {
    pub summaries: Vec<TxSummary>,
    pub raw: Vec<Value>,
    pub score: Option<EvalScore>,
    pub meta: Option<RunMeta>,
    /// Needle context: `eval_needle.json` when available, else the
    /// manifest's needle_eval, else nothing.
    pub needle: Option<Value>,
}

/// Load a hosted run under `run_dir`. The required transaction pair is
/// fetched together; the optional sidecars are fetched concurrently and
/// any failure among them degrades to absence.
pub async fn load_hosted(
    source: &dyn ArtifactSource,
    run_dir: &str,
    is_needle_run: bool,
    manifest_needle: Option<&NeedleEval>,
) -> Result<RunData> {
    let dir = run_dir.trim_end_matches('/');
    let (eval_text, per_text) = try_join(
        source.text(&format!("{}/{}", dir, EVAL_PER_TX)),
        source.text(&format!("{}/{}", dir, PER_TX)),
    )
    .await?;

    let fallback_needle = manifest_needle.and_then(|n| serde_json::to_value(n).ok());
    let (score, meta, needle) = join3(
        source.json(&format!("{}/{}", dir, EVAL_SCORE)),
        source.json(&format!("{}/{}", dir, META)),
        source.json(&format!("{}/{}", dir, EVAL_NEEDLE)),
    )
    .await;

    let needle = if is_needle_run {
        needle.ok().or(fallback_needle)
    } else {
        fallback_needle
    };

    let summaries: Vec<TxSummary> = parse_jsonl(&eval_text);
    let raw: Vec<Value> = parse_jsonl(&per_text);
    info(
        Domain::Fetch,
        "run_loaded",
        obj(&[
            ("run_dir", v_str(dir)),
            ("summaries", v_num(summaries.len() as f64)),
            ("raw_records", v_num(raw.len() as f64)),
        ]),
    );

    Ok(RunData {
        summaries,
        raw,
        score: score.ok().and_then(|v| serde_json::from_value(v).ok()),
        meta: meta.ok().and_then(|v| serde_json::from_value(v).ok()),
        needle,
    })
}

/// Required bundle files that were not found.
#[derive(Debug)]
pub struct MissingFiles(pub Vec<String>);

impl fmt::Display for MissingFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required files: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingFiles {}

/// A user-supplied directory of run files, matched by basename.
#[derive(Debug, Clone)]
pub struct LocalBundle {
    files: HashMap<String, PathBuf>,
}

impl LocalBundle {
    /// Index a set of selected files by basename. First match wins.
    pub fn from_files<I: IntoIterator<Item = PathBuf>>(paths: I) -> Self {
        let mut files = HashMap::new();
        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.entry(name.to_string()).or_insert(path);
            }
        }
        Self { files }
    }

    /// Index a directory tree, mirroring a directory-upload selection.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        collect_files(dir, &mut paths)
            .with_context(|| format!("cannot read bundle dir {}", dir.display()))?;
        Ok(Self::from_files(paths))
    }

    pub fn get(&self, basename: &str) -> Option<&Path> {
        self.files.get(basename).map(|p| p.as_path())
    }

    /// Names from the required set that the selection does not cover.
    pub fn missing_required(&self) -> Vec<String> {
        [EVAL_PER_TX, PER_TX]
            .iter()
            .filter(|name| !self.files.contains_key(**name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Load the bundle. Aborts with `MissingFiles` before parsing
    /// anything if a required file is absent; optional sidecars are
    /// parsed only when present.
    pub fn load(&self) -> Result<RunData> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(MissingFiles(missing).into());
        }
        let required = |name: &str| {
            self.get(name)
                .ok_or_else(|| MissingFiles(vec![name.to_string()]))
        };
        let eval_text = read_file_as_text(required(EVAL_PER_TX)?)?;
        let per_text = read_file_as_text(required(PER_TX)?)?;
        let score = self
            .get(EVAL_SCORE)
            .and_then(|p| read_file_as_text(p).ok())
            .and_then(|t| serde_json::from_str(&t).ok());
        let needle = self
            .get(EVAL_NEEDLE)
            .and_then(|p| read_file_as_text(p).ok())
            .and_then(|t| serde_json::from_str(&t).ok());
        Ok(RunData {
            summaries: parse_jsonl(&eval_text),
            raw: parse_jsonl(&per_text),
            score,
            meta: None,
            needle,
        })
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Generation gate for explorer loads. A new selection starts a new
/// generation; results from loads that began under an older generation
/// are rejected instead of overwriting the newer view.
#[derive(Debug, Default)]
pub struct LoadGate {
    current: AtomicU64,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding all in-flight ones. Returns the token
    /// the finished load must present.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a load holding `token` is still the current one.
    pub fn admit(&self, token: u64) -> bool {
        self.current.load(Ordering::SeqCst) == token
    }
}
