//! Typed schema for the external inputs produced by the evaluation
//! pipeline. Decoding happens once at the loader boundary; downstream
//! code works with these shapes and never re-checks JSON structure.
//!
//! Everything optional in the upstream artifacts is optional here.
//! Fields are never mutated after decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// models.json: the run manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub meta: SiteMeta,
    #[serde(default)]
    pub runs: Vec<BenchmarkRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteMeta {
    #[serde(default)]
    pub coverage_dataset: Option<String>,
    #[serde(default)]
    pub needle_dataset: Option<String>,
}

/// One leaderboard entry. `rank` is unique and defines display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRun {
    pub rank: u32,
    pub agent: String,
    pub coverage_run_id: String,
    /// Location of the coverage-run artifacts, relative to the data root.
    pub coverage_run: String,
    #[serde(default)]
    pub coverage_score: Option<CoverageScore>,
    #[serde(default)]
    pub intent_eval: Option<IntentEval>,
    #[serde(default)]
    pub needle_eval: Option<NeedleEval>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageScore {
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub unique_actions: Option<u64>,
    #[serde(default)]
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentEval {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeedleEval {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub run_dir: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub dataset: Option<String>,
}

/// Recognized needle outcomes. Unknown codes fall through to `Other` so
/// new categories never leave a badge unstyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedleResult {
    Pass,
    PassWithWarnings,
    Partial,
    Fail,
    Other,
}

impl NeedleResult {
    pub fn parse(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "PASS" => NeedleResult::Pass,
            "PASS_WITH_WARNINGS" => NeedleResult::PassWithWarnings,
            "PARTIAL" => NeedleResult::Partial,
            "FAIL" => NeedleResult::Fail,
            _ => NeedleResult::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-run transaction artifacts
// ---------------------------------------------------------------------------

/// One row of `eval_per_tx.jsonl`. Keyed by `intent_id`, falling back to
/// `digest`; the same key joins the row to its raw transaction record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxSummary {
    #[serde(default)]
    pub intent_id: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionSig>,
    // bonus/penalty arrive as numbers, numeric strings, or null depending
    // on the pipeline version; coerced at format time.
    #[serde(default)]
    pub bonus: Value,
    #[serde(default)]
    pub penalty: Value,
}

impl TxSummary {
    pub fn key(&self) -> &str {
        self.intent_id
            .as_deref()
            .or(self.digest.as_deref())
            .unwrap_or("")
    }
}

/// Action signature, used only for display composition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSig {
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub tokens: Option<Vec<String>>,
}

/// Optional `eval_score.json` sidecar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalScore {
    #[serde(default)]
    pub final_score: Option<f64>,
    #[serde(default)]
    pub bonus: Option<f64>,
}

/// Optional `meta.json` sidecar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMeta {
    #[serde(default)]
    pub bench_version: Option<String>,
}

// ---------------------------------------------------------------------------
// content.json: display strings per page section
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub site: SiteContent,
    #[serde(default)]
    pub home: HomeContent,
    #[serde(default)]
    pub needle: NeedlePageContent,
    #[serde(default)]
    pub trajectories: TrajectoriesContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    pub title: String,
    pub nav: NavContent,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            title: "Benchmark Leaderboard".to_string(),
            nav: NavContent::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavContent {
    pub home: String,
    pub trajectories: String,
    pub needle: String,
}

impl Default for NavContent {
    fn default() -> Self {
        Self {
            home: "Leaderboard".to_string(),
            trajectories: "Trajectories".to_string(),
            needle: "Needle".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeContent {
    pub hero: HeroContent,
    pub scoreboard: ScoreboardContent,
    pub charts: ChartTitles,
    pub howto: HowtoContent,
    pub footer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub pillars: Vec<Pillar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pillar {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardContent {
    pub title: String,
    pub source: String,
    pub link_text: String,
    pub link_href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTitles {
    pub coverage: String,
    pub needle: String,
}

impl Default for ChartTitles {
    fn default() -> Self {
        Self {
            coverage: "Coverage and intent scores".to_string(),
            needle: "Needle scores".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HowtoContent {
    pub title: String,
    pub steps: Vec<String>,
    pub footnote: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedlePageContent {
    pub title: String,
    pub subtitle: String,
    pub datasets: DatasetsContent,
    pub table: NeedleTableContent,
    pub notes: NotesContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetsContent {
    pub coverage: DatasetCard,
    pub needle: DatasetCard,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetCard {
    pub label: String,
    pub description: String,
    pub cta: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedleTableContent {
    pub caption: String,
    pub cols: TableCols,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCols {
    pub rank: String,
    pub agent: String,
    pub coverage: String,
    pub intent: String,
    pub needle_result: String,
    pub needle_score: String,
    pub actions: String,
    pub runs: String,
}

impl Default for TableCols {
    fn default() -> Self {
        Self {
            rank: "#".to_string(),
            agent: "Agent".to_string(),
            coverage: "Coverage median".to_string(),
            intent: "Intent score".to_string(),
            needle_result: "Needle result".to_string(),
            needle_score: "Needle score".to_string(),
            actions: "Unique actions".to_string(),
            runs: "Runs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesContent {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoriesContent {
    pub title: String,
    pub subtitle: String,
    pub uploader: UploaderContent,
    pub detail_title: String,
    pub close: String,
    pub errors: TrajectoryErrors,
}

impl Default for TrajectoriesContent {
    fn default() -> Self {
        Self {
            title: "Trajectories".to_string(),
            subtitle: String::new(),
            uploader: UploaderContent::default(),
            detail_title: "Transaction detail".to_string(),
            close: "Close".to_string(),
            errors: TrajectoryErrors::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderContent {
    pub sample_btn: String,
    pub or: String,
    pub pick_label: String,
    pub note: String,
    pub select_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryErrors {
    pub missing_files: String,
}

impl Default for TrajectoryErrors {
    fn default() -> Self {
        Self {
            missing_files: "Missing required files.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_tolerates_missing_sections() {
        let m: Manifest = serde_json::from_str("{}").unwrap();
        assert!(m.runs.is_empty());
        assert!(m.meta.coverage_dataset.is_none());
    }

    #[test]
    fn run_decodes_with_sparse_fields() {
        let run: BenchmarkRun = serde_json::from_str(
            r#"{"rank":2,"agent":"AgentB","coverage_run_id":"r2","coverage_run":"runs/r2"}"#,
        )
        .unwrap();
        assert_eq!(run.rank, 2);
        assert!(run.coverage_score.is_none());
        assert!(run.needle_eval.is_none());
    }

    #[test]
    fn tx_summary_key_falls_back_to_digest() {
        let with_intent: TxSummary =
            serde_json::from_str(r#"{"intent_id":"i1","digest":"d1"}"#).unwrap();
        assert_eq!(with_intent.key(), "i1");
        let digest_only: TxSummary = serde_json::from_str(r#"{"digest":"d2"}"#).unwrap();
        assert_eq!(digest_only.key(), "d2");
        let neither = TxSummary::default();
        assert_eq!(neither.key(), "");
    }

    #[test]
    fn needle_result_parse_is_case_insensitive_with_default() {
        assert_eq!(NeedleResult::parse("pass"), NeedleResult::Pass);
        assert_eq!(
            NeedleResult::parse("PASS_WITH_WARNINGS"),
            NeedleResult::PassWithWarnings
        );
        assert_eq!(NeedleResult::parse("flaky"), NeedleResult::Other);
    }

    #[test]
    fn content_defaults_cover_missing_strings() {
        let c: Content = serde_json::from_str("{}").unwrap();
        assert_eq!(c.trajectories.errors.missing_files, "Missing required files.");
        assert_eq!(c.needle.table.cols.agent, "Agent");
    }

    #[test]
    fn loose_bonus_penalty_scalars_decode() {
        let s: TxSummary =
            serde_json::from_str(r#"{"digest":"d","bonus":"2.5","penalty":null}"#).unwrap();
        assert_eq!(s.bonus, serde_json::json!("2.5"));
        assert!(s.penalty.is_null());
    }
}
