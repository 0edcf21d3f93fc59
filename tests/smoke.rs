//! Smoke tests: end-to-end site builds over fixture data.
//!
//! These exercise the whole pipeline (manifest decode, catalog, run
//! loading, view models, HTML emission) against a real directory tree,
//! the same shape the hosted site serves.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use benchsite::config::{Config, DataRoot};
use benchsite::model::Content;
use benchsite::site::{build_site, render_bundle};
use benchsite::source::LocalBundle;

const CONTENT: &str = r#"{
  "site": {"title": "Agent Bench", "nav": {"home": "Leaderboard", "trajectories": "Trajectories", "needle": "Needle"}},
  "home": {
    "hero": {"title": "Agent Bench", "subtitle": "Coverage and needle evals", "pillars": []},
    "scoreboard": {"title": "Scoreboard", "source": "Datasets:", "link_text": "Explore trajectories", "link_href": ""},
    "charts": {"coverage": "Coverage vs intent", "needle": "Needle scores"},
    "howto": {"title": "How to read", "steps": ["Pick a run"], "footnote": "Scores are precomputed."},
    "footer": "fixture"
  },
  "needle": {
    "title": "Needle comparison", "subtitle": "Two headline datasets",
    "datasets": {
      "coverage": {"label": "Coverage dataset", "description": "breadth", "cta": "Open"},
      "needle": {"label": "Needle dataset", "description": "targeted", "cta": "Open"}
    },
    "table": {"caption": "All runs", "cols": {}},
    "notes": {"title": "Notes", "items": ["read-only"]}
  },
  "trajectories": {
    "title": "Trajectories", "subtitle": "Per-transaction detail",
    "uploader": {"note": "Pick a run below."},
    "detail_title": "Detail", "close": "Close",
    "errors": {"missing_files": "Missing required files."}
  }
}"#;

const MODELS: &str = r#"{
  "meta": {"coverage_dataset": "https://data.example/coverage-v2", "needle_dataset": "sets/needle_v1.jsonl"},
  "runs": [
    {
      "rank": 2, "agent": "AgentB", "coverage_run_id": "b1", "coverage_run": "runs/b1",
      "coverage_score": {"median": 0.5}
    },
    {
      "rank": 1, "agent": "AgentA", "coverage_run_id": "a1", "coverage_run": "runs/a1",
      "coverage_score": {"median": 0.8, "unique_actions": 17},
      "intent_eval": {"score": 3.4},
      "needle_eval": {"run_id": "n1", "run_dir": "runs/n1", "result": "PASS", "score": 4.2}
    }
  ]
}"#;

fn write_run(dir: &Path, with_sidecars: bool) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("eval_per_tx.jsonl"),
        "{\"intent_id\":\"i1\",\"domains\":[\"dex\"],\"actions\":[{\"chain_id\":1,\"action\":\"swap\",\"tokens\":[\"USDC\",\"WETH\"]}],\"bonus\":1.5,\"penalty\":0}\n\
garbage line\n\
{\"digest\":\"d2\",\"domains\":[\"derivatives\",\"unknown\"],\"bonus\":\"0.5\",\"penalty\":\"0.1\"}\n",
    )
    .unwrap();
    fs::write(
        dir.join("per_tx.jsonl"),
        "{\"intent_id\":\"i1\",\"tx\":\"0xabc\"}\n{\"digest\":\"d2\",\"tx\":\"0xdef\"}\n",
    )
    .unwrap();
    if with_sidecars {
        fs::write(dir.join("eval_score.json"), "{\"final_score\":3.9,\"bonus\":0.4}").unwrap();
        fs::write(dir.join("meta.json"), "{\"bench_version\":\"1.2.0\"}").unwrap();
        fs::write(dir.join("eval_needle.json"), "{\"result\":\"PASS\",\"score\":4.2}").unwrap();
    }
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("content.json"), CONTENT).unwrap();
    fs::write(data.join("models.json"), MODELS).unwrap();
    write_run(&data.join("runs/a1"), false);
    write_run(&data.join("runs/b1"), false);
    write_run(&data.join("runs/n1"), true);
    tmp
}

fn config_for(tmp: &TempDir) -> Config {
    let mut cfg = Config::from_env();
    cfg.data = DataRoot::Dir(tmp.path().join("data"));
    cfg.out_dir = tmp.path().join("site");
    cfg
}

// ---------------------------------------------------------------------------
// Full build over fixture data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn build_writes_all_pages() {
    let tmp = fixture_site();
    let cfg = config_for(&tmp);
    let report = build_site(&cfg).await.unwrap();

    // css + index + needle + explorer index + 3 option pages
    assert_eq!(report.options_rendered, 3);
    assert_eq!(report.options_failed, 0);
    assert_eq!(report.pages_written, 7);

    for page in [
        "index.html",
        "needle.html",
        "assets/site.css",
        "trajectories/index.html",
        "trajectories/coverage-a1.html",
        "trajectories/needle-n1.html",
        "trajectories/coverage-b1.html",
    ] {
        assert!(cfg.out_dir.join(page).exists(), "missing {}", page);
    }
}

#[tokio::test]
async fn leaderboard_rows_render_in_rank_order_with_needle_fallbacks() {
    let tmp = fixture_site();
    let cfg = config_for(&tmp);
    build_site(&cfg).await.unwrap();

    let index = fs::read_to_string(cfg.out_dir.join("index.html")).unwrap();
    // rank order despite manifest order
    let a = index.find("AgentA").expect("AgentA row");
    let b = index.find("AgentB").expect("AgentB row");
    assert!(a < b, "rows not in rank order");
    // row 1: PASS badge and needle score
    assert!(index.contains("tag-pass"));
    assert!(index.contains("4.20"));
    assert!(index.contains("3.40"));
    // row 2: no needle link, dash needle columns
    assert!(!index.contains("needle-b1"));
    // deep links into the explorer
    assert!(index.contains("trajectories/coverage-a1.html#coverage-a1"));
    assert!(index.contains("trajectories/needle-n1.html#needle-n1"));
    // chart payloads for the external renderer
    assert!(index.contains("data-chart=\"score-chart\""));
    assert!(index.contains("\"suggested_max\":5.0"));
}

#[tokio::test]
async fn needle_page_links_only_web_datasets() {
    let tmp = fixture_site();
    let cfg = config_for(&tmp);
    build_site(&cfg).await.unwrap();

    let needle = fs::read_to_string(cfg.out_dir.join("needle.html")).unwrap();
    assert!(needle.contains("href=\"https://data.example/coverage-v2\""));
    assert!(needle.contains("target=\"_blank\""));
    // plain path dataset gets a disabled self-link
    assert!(needle.contains("sets/needle_v1.jsonl"));
    assert!(needle.contains("href=\"#\" target=\"_self\""));
}

#[tokio::test]
async fn trajectory_pages_join_summaries_to_raw_records() {
    let tmp = fixture_site();
    let cfg = config_for(&tmp);
    build_site(&cfg).await.unwrap();

    let page = fs::read_to_string(cfg.out_dir.join("trajectories/needle-n1.html")).unwrap();
    // two summaries survived the malformed middle line
    assert!(page.contains("i1"));
    assert!(page.contains("d2"));
    // joined raw detail and formatted fields
    assert!(page.contains("0xabc"));
    assert!(page.contains("chain 1 · swap (USDC → WETH)"));
    assert!(page.contains("tag-dex"));
    assert!(page.contains("tag-derivatives"));
    assert!(page.contains("tag-default"));
    // run info banner: rank, kind, sidecar scores, bench version
    assert!(page.contains("#1 · AgentA"));
    assert!(page.contains("Needle run"));
    assert!(page.contains("Final score 3.90"));
    assert!(page.contains("Bench 1.2.0"));
    // numeric-string penalty coerced
    assert!(page.contains("0.10"));
}

#[tokio::test]
async fn explorer_index_addresses_every_option() {
    let tmp = fixture_site();
    let cfg = config_for(&tmp);
    build_site(&cfg).await.unwrap();

    let index = fs::read_to_string(cfg.out_dir.join("trajectories/index.html")).unwrap();
    assert!(index.contains("id=\"coverage-a1\""));
    assert!(index.contains("id=\"needle-n1\""));
    assert!(index.contains("id=\"coverage-b1\""));
    assert!(index.contains("#1 · AgentA · Needle (PASS)"));
}

// ---------------------------------------------------------------------------
// Degraded inputs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_run_dir_skips_page_but_builds_site() {
    let tmp = fixture_site();
    // break one run directory
    fs::remove_file(tmp.path().join("data/runs/b1/per_tx.jsonl")).unwrap();
    let cfg = config_for(&tmp);
    let report = build_site(&cfg).await.unwrap();

    assert_eq!(report.options_failed, 1);
    assert_eq!(report.options_rendered, 2);
    assert!(cfg.out_dir.join("index.html").exists());
    assert!(!cfg.out_dir.join("trajectories/coverage-b1.html").exists());
}

#[tokio::test]
async fn missing_manifest_fails_loudly() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("content.json"), CONTENT).unwrap();
    let mut cfg = Config::from_env();
    cfg.data = DataRoot::Dir(data);
    cfg.out_dir = tmp.path().join("site");
    assert!(build_site(&cfg).await.is_err());
}

// ---------------------------------------------------------------------------
// Local bundle path
// ---------------------------------------------------------------------------

#[test]
fn bundle_missing_required_file_aborts_with_message() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("eval_per_tx.jsonl"), "{\"digest\":\"d1\"}\n").unwrap();
    fs::write(tmp.path().join("eval_score.json"), "{}").unwrap();
    let bundle = LocalBundle::from_dir(tmp.path()).unwrap();
    let content: Content = serde_json::from_str(CONTENT).unwrap();
    let err = render_bundle(&content, &bundle).unwrap_err();
    assert!(err.to_string().contains("Missing required files."));
    assert!(err.to_string().contains("per_tx.jsonl"));
}

#[test]
fn bundle_renders_uploaded_run_page() {
    let tmp = TempDir::new().unwrap();
    write_run(tmp.path(), true);
    let bundle = LocalBundle::from_dir(tmp.path()).unwrap();
    let content: Content = serde_json::from_str(CONTENT).unwrap();
    let html = render_bundle(&content, &bundle).unwrap();
    assert!(html.contains("Uploaded run"));
    assert!(html.contains("Final score 3.90"));
    assert!(html.contains("Needle 4.20"));
    assert!(html.contains("0xdef"));
}
