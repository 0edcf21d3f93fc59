//! benchsite CLI.
//!
//! Commands:
//!   build            Build the full static site from hosted or local data
//!   bundle <dir>     Render a local run bundle to a standalone page
//!
//! Options (build):
//!   --data-dir=<dir>   Read inputs from a local directory (default: data)
//!   --data-url=<url>   Fetch inputs over HTTP instead
//!   --out=<dir>        Output directory (default: site)
//!   --manifest=<file>  Run manifest name (default: models.json)
//!   --content=<file>   Content file name (default: content.json)
//!
//! Options (bundle):
//!   --out=<file>       Output HTML path (default: <dir>/trajectory.html)
//!   --content=<path>   Local content.json for display strings

use anyhow::{Context, Result};
use std::path::PathBuf;

use benchsite::config::Config;
use benchsite::fetch::read_file_as_text;
use benchsite::logging::{error, info, obj, v_num, v_str, Domain};
use benchsite::model::Content;
use benchsite::site::{build_site, render_bundle};
use benchsite::source::LocalBundle;

fn print_usage() {
    eprintln!("Usage: benchsite <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build              Build the static site");
    eprintln!("  bundle <dir>       Render a local run bundle");
    eprintln!();
    eprintln!("Run with --data-dir=, --data-url=, --out= to override the environment.");
}

async fn cmd_build(args: &[String]) -> Result<()> {
    let mut cfg = Config::from_env();
    cfg.apply_args(args.iter().map(|s| s.as_str()));
    let report = build_site(&cfg).await?;
    println!(
        "wrote {} pages to {} ({} runs rendered, {} failed)",
        report.pages_written,
        cfg.out_dir.display(),
        report.options_rendered,
        report.options_failed
    );
    Ok(())
}

fn cmd_bundle(dir: &str, args: &[String]) -> Result<()> {
    let dir = PathBuf::from(dir);
    let mut out = dir.join("trajectory.html");
    let mut content = Content::default();
    for arg in args {
        if let Some(v) = arg.strip_prefix("--out=") {
            out = PathBuf::from(v);
        } else if let Some(v) = arg.strip_prefix("--content=") {
            let text = read_file_as_text(&PathBuf::from(v))?;
            content = serde_json::from_str(&text).with_context(|| format!("invalid content {}", v))?;
        }
    }

    let bundle = LocalBundle::from_dir(&dir)?;
    let html = render_bundle(&content, &bundle)?;
    std::fs::write(&out, html).with_context(|| format!("cannot write {}", out.display()))?;
    info(
        Domain::Render,
        "bundle_rendered",
        obj(&[
            ("dir", v_str(&dir.display().to_string())),
            ("out", v_str(&out.display().to_string())),
        ]),
    );
    println!("wrote {}", out.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(|s| s.as_str()) {
        Some("build") => cmd_build(&args[1..]).await,
        Some("bundle") => match args.get(1) {
            Some(dir) if !dir.starts_with("--") => cmd_bundle(dir, &args[2..]),
            _ => {
                eprintln!("Usage: benchsite bundle <dir> [--out=FILE] [--content=PATH]");
                std::process::exit(1);
            }
        },
        Some("--help") | Some("-h") | None => {
            print_usage();
            return;
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        error(
            Domain::System,
            "fatal",
            obj(&[
                ("error", v_str(&format!("{:#}", err))),
                ("code", v_num(1.0)),
            ]),
        );
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
