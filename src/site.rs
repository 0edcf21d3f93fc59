//! Site orchestration: load inputs, build the catalog, write every page.

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::Path;

use crate::catalog::{build_catalog, sort_runs, RunKind, RunOption};
use crate::config::{Config, DataRoot};
use crate::logging::{error, info, obj, v_num, v_str, Domain};
use crate::model::{Content, Manifest};
use crate::render;
use crate::source::{load_hosted, ArtifactSource, FsSource, HttpSource, LoadGate, LocalBundle, RunData};
use crate::views::leaderboard::{leaderboard_rows, needle_chart, score_chart};
use crate::views::needle::headline_datasets;
use crate::views::trajectory::{run_info, tx_rows};

/// Outcome of one full build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages_written: usize,
    pub options_rendered: usize,
    pub options_failed: usize,
}

pub fn make_source(cfg: &Config) -> Box<dyn ArtifactSource> {
    match &cfg.data {
        DataRoot::Url(base) => Box::new(HttpSource::new(Client::new(), base)),
        DataRoot::Dir(dir) => Box::new(FsSource::new(dir.clone())),
    }
}

/// Load a run for one catalog option through the completion gate. A load
/// superseded by a newer `begin` on the same gate is discarded and
/// reported as `None` instead of overwriting fresher state.
pub async fn load_option(
    source: &dyn ArtifactSource,
    option: &RunOption,
    gate: &LoadGate,
) -> Result<Option<RunData>> {
    let token = gate.begin();
    let data = load_hosted(
        source,
        &option.path,
        option.kind == RunKind::Needle,
        option.needle.as_ref(),
    )
    .await?;
    if !gate.admit(token) {
        info(
            Domain::Fetch,
            "load_superseded",
            obj(&[("option", v_str(&option.id))]),
        );
        return Ok(None);
    }
    Ok(Some(data))
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("cannot write {}", path.display()))
}

/// Baseline stylesheet: every tag class the formatter can emit gets a
/// rule, so no category renders unstyled.
const BASE_CSS: &str = "\
body{font-family:sans-serif;margin:0;color:#0f172a}\n\
.site-header{display:flex;gap:1rem;padding:1rem;border-bottom:1px solid #e2e8f0}\n\
main{max-width:72rem;margin:0 auto;padding:1rem}\n\
table{border-collapse:collapse;width:100%}\n\
td,th{padding:.4rem .6rem;border-bottom:1px solid #e2e8f0;text-align:left}\n\
.num{text-align:right;font-family:monospace}\n\
.mono{font-family:monospace;font-size:.8rem}\n\
.tag{padding:.1rem .4rem;border-radius:.3rem;font-size:.75rem}\n\
.tag-dex{background:#dbeafe}\n.tag-lending{background:#dcfce7}\n\
.tag-yield{background:#fef9c3}\n.tag-bridge{background:#ede9fe}\n\
.tag-derivatives{background:#ffe4e6}\n.tag-default{background:#e2e8f0}\n\
.tag-pass{background:#bbf7d0}\n.tag-warning{background:#fde68a}\n\
.tag-partial{background:#fed7aa}\n.tag-fail{background:#fecaca}\n";

/// Build the whole site into `cfg.out_dir`. A failing run page is logged
/// and skipped; the rest of the site still builds.
pub async fn build_site(cfg: &Config) -> Result<BuildReport> {
    let source = make_source(cfg);
    info(
        Domain::System,
        "build_start",
        obj(&[("data", v_str(&source.describe()))]),
    );

    let content: Content = serde_json::from_value(source.json(&cfg.content_file).await?)
        .with_context(|| format!("invalid {}", cfg.content_file))?;
    let mut manifest: Manifest = serde_json::from_value(source.json(&cfg.manifest_file).await?)
        .with_context(|| format!("invalid {}", cfg.manifest_file))?;
    sort_runs(&mut manifest.runs);

    let catalog = build_catalog(&manifest.runs);
    info(
        Domain::Catalog,
        "catalog_built",
        obj(&[
            ("runs", v_num(manifest.runs.len() as f64)),
            ("options", v_num(catalog.len() as f64)),
        ]),
    );

    let mut report = BuildReport::default();
    write_page(&cfg.out_dir.join("assets").join("site.css"), BASE_CSS)?;
    report.pages_written += 1;

    // Leaderboard source line: meta datasets with first-run fallback.
    let coverage_ds = manifest
        .meta
        .coverage_dataset
        .clone()
        .or_else(|| {
            manifest
                .runs
                .first()
                .and_then(|r| r.coverage_score.as_ref())
                .and_then(|c| c.dataset.clone())
        })
        .unwrap_or_else(|| "-".to_string());
    let needle_ds = manifest
        .meta
        .needle_dataset
        .clone()
        .or_else(|| {
            manifest
                .runs
                .first()
                .and_then(|r| r.needle_eval.as_ref())
                .and_then(|n| n.dataset.clone())
        })
        .unwrap_or_else(|| "-".to_string());
    let source_line = format!(
        "{} {} · {}",
        content.home.scoreboard.source, coverage_ds, needle_ds
    );

    let rows = leaderboard_rows(&manifest.runs);
    write_page(
        &cfg.out_dir.join("index.html"),
        &render::leaderboard_page(
            &content,
            &rows,
            &source_line,
            &score_chart(&manifest.runs),
            &needle_chart(&manifest.runs),
        ),
    )?;
    report.pages_written += 1;

    let (coverage_ref, needle_ref) = headline_datasets(&manifest.meta, &manifest.runs);
    write_page(
        &cfg.out_dir.join("needle.html"),
        &render::needle_page(&content, &rows, &coverage_ref, &needle_ref),
    )?;
    report.pages_written += 1;

    write_page(
        &cfg.out_dir.join("trajectories").join("index.html"),
        &render::explorer_index_page(&content, &catalog),
    )?;
    report.pages_written += 1;

    let gate = LoadGate::new();
    for option in &catalog {
        match load_option(source.as_ref(), option, &gate).await {
            Ok(Some(data)) => {
                let rows = tx_rows(&data, Some(option));
                let info_parts = run_info(Some(option), &data);
                let html = render::trajectory_page(
                    &content,
                    &option.label,
                    Some(option.id.as_str()),
                    &info_parts,
                    &rows,
                );
                write_page(
                    &cfg.out_dir
                        .join("trajectories")
                        .join(format!("{}.html", option.id)),
                    &html,
                )?;
                report.pages_written += 1;
                report.options_rendered += 1;
            }
            Ok(None) => {}
            Err(err) => {
                report.options_failed += 1;
                error(
                    Domain::Fetch,
                    "option_load_failed",
                    obj(&[
                        ("option", v_str(&option.id)),
                        ("error", v_str(&format!("{:#}", err))),
                    ]),
                );
            }
        }
    }

    info(
        Domain::System,
        "build_done",
        obj(&[
            ("pages", v_num(report.pages_written as f64)),
            ("options_rendered", v_num(report.options_rendered as f64)),
            ("options_failed", v_num(report.options_failed as f64)),
        ]),
    );
    Ok(report)
}

/// Render a locally supplied run bundle to a standalone explorer page.
/// Missing required files abort before any rendering, surfacing the
/// configured message.
pub fn render_bundle(content: &Content, bundle: &LocalBundle) -> Result<String> {
    let missing = bundle.missing_required();
    if !missing.is_empty() {
        anyhow::bail!(
            "{} ({})",
            content.trajectories.errors.missing_files,
            missing.join(", ")
        );
    }
    let data = bundle.load()?;
    let rows = tx_rows(&data, None);
    let info_parts = run_info(None, &data);
    Ok(render::trajectory_page(
        content,
        &content.trajectories.title,
        None,
        &info_parts,
        &rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundle_missing_files_surfaces_configured_message() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("eval_per_tx.jsonl"), "{}\n").unwrap();
        let bundle = LocalBundle::from_dir(tmp.path()).unwrap();
        let content: Content = serde_json::from_str(
            r#"{"trajectories":{"errors":{"missing_files":"Bundle is incomplete."}}}"#,
        )
        .unwrap();
        let err = render_bundle(&content, &bundle).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Bundle is incomplete."));
        assert!(msg.contains("per_tx.jsonl"));
    }

    #[test]
    fn bundle_renders_rows_and_uploaded_banner() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("eval_per_tx.jsonl"),
            "{\"digest\":\"d1\",\"domains\":[\"dex\"],\"bonus\":2}\n",
        )
        .unwrap();
        fs::write(tmp.path().join("per_tx.jsonl"), "{\"digest\":\"d1\"}\n").unwrap();
        let bundle = LocalBundle::from_dir(tmp.path()).unwrap();
        let content = Content::default();
        let html = render_bundle(&content, &bundle).unwrap();
        assert!(html.contains("Uploaded run"));
        assert!(html.contains("d1"));
        assert!(html.contains("tag-dex"));
    }
}
