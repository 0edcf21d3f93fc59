//! Run-bundle validation: file inventory, record counts, checksums.
//!
//! Backs the `bundle_check` tool. The manifest written next to a bundle
//! lets a published run directory be verified byte-for-byte later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::fetch::read_file_as_text;
use crate::source::{LocalBundle, EVAL_NEEDLE, EVAL_PER_TX, EVAL_SCORE, META, PER_TX};

pub const OPTIONAL_FILES: [&str; 3] = [EVAL_SCORE, META, EVAL_NEEDLE];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub sha256: String,
    pub bytes: u64,
    /// JSONL record count; `None` for plain JSON sidecars.
    pub records: Option<u64>,
    pub bad_lines: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub dir: String,
    pub ok: bool,
    pub missing_required: Vec<String>,
    pub files: Vec<FileEntry>,
    pub warnings: Vec<String>,
    pub generated_at: String,
}

fn jsonl_counts(text: &str) -> (u64, u64) {
    let mut records = 0u64;
    let mut bad = 0u64;
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(_) => records += 1,
            Err(_) => bad += 1,
        }
    }
    (records, bad)
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn analyze_file(path: &Path, name: &str, warnings: &mut Vec<String>) -> Result<FileEntry> {
    let bytes = std::fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len();
    let sha256 = file_sha256(path)?;
    let (records, bad_lines) = if name.ends_with(".jsonl") {
        let text = read_file_as_text(path)?;
        let (records, bad) = jsonl_counts(&text);
        if bad > 0 {
            warnings.push(format!("{}: {} unparseable lines", name, bad));
        }
        (Some(records), bad)
    } else {
        let text = read_file_as_text(path)?;
        if serde_json::from_str::<Value>(&text).is_err() {
            warnings.push(format!("{}: not valid JSON", name));
        }
        (None, 0)
    };
    Ok(FileEntry {
        name: name.to_string(),
        sha256,
        bytes,
        records,
        bad_lines,
    })
}

/// Inventory a bundle directory. Missing required files mark the bundle
/// not-ok but the inventory still covers whatever is present.
pub fn analyze_bundle(dir: &Path) -> Result<BundleManifest> {
    let bundle = LocalBundle::from_dir(dir)?;
    let missing = bundle.missing_required();
    let mut warnings = Vec::new();
    let mut files = Vec::new();
    for name in [EVAL_PER_TX, PER_TX].iter().chain(OPTIONAL_FILES.iter()) {
        if let Some(path) = bundle.get(name) {
            files.push(analyze_file(path, name, &mut warnings)?);
        }
    }
    Ok(BundleManifest {
        dir: dir.display().to_string(),
        ok: missing.is_empty(),
        missing_required: missing,
        files,
        warnings,
        generated_at: crate::logging::ts_now(),
    })
}

pub fn default_manifest_path(dir: &Path) -> PathBuf {
    dir.join("bundle.manifest.json")
}
