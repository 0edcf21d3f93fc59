//! Validate a run bundle directory and write its manifest.
//!
//! Usage: bundle_check <dir> [--json]
//!
//! Checks required/optional file presence, counts JSONL records and
//! unparseable lines, and records a sha256 per file. The manifest lands
//! at <dir>/bundle.manifest.json.
//!
//! Exit codes: 0 ok, 2 missing required files, 3 unreadable bundle.

use benchsite::bundle::{analyze_bundle, default_manifest_path};
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(dir) = args.first().filter(|a| !a.starts_with("--")) else {
        eprintln!("Usage: bundle_check <dir> [--json]");
        std::process::exit(1);
    };
    let as_json = args.iter().any(|a| a == "--json");
    let dir = PathBuf::from(dir);

    let manifest = match analyze_bundle(&dir) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("bundle check failed: {:#}", err);
            std::process::exit(3);
        }
    };

    let out_path = default_manifest_path(&dir);
    match serde_json::to_string_pretty(&manifest) {
        Ok(payload) => {
            if let Err(err) = std::fs::write(&out_path, payload) {
                eprintln!("failed to write {}: {}", out_path.display(), err);
                std::process::exit(3);
            }
        }
        Err(err) => {
            eprintln!("failed to serialize manifest: {}", err);
            std::process::exit(3);
        }
    }

    if as_json {
        println!("{}", serde_json::to_string(&manifest).unwrap_or_default());
    } else {
        println!("=== Bundle Check: {} ===", manifest.dir);
        for file in &manifest.files {
            match file.records {
                Some(records) => println!(
                    "  {:<20} {:>8} records {:>4} bad  sha256 {}",
                    file.name,
                    records,
                    file.bad_lines,
                    &file.sha256[..16]
                ),
                None => println!(
                    "  {:<20} {:>8} bytes       sha256 {}",
                    file.name,
                    file.bytes,
                    &file.sha256[..16]
                ),
            }
        }
        for warning in &manifest.warnings {
            println!("  warning: {}", warning);
        }
        if manifest.ok {
            println!("ok, manifest written to {}", out_path.display());
        } else {
            println!("missing required: {}", manifest.missing_required.join(", "));
        }
    }

    if !manifest.ok {
        std::process::exit(2);
    }
}
