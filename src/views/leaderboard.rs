//! Leaderboard view: one row per benchmark run plus the two aggregate
//! chart specs handed to the external chart renderer.

use serde::Serialize;

use crate::fmt::{fmt_score, needle_badge, Tag};
use crate::model::BenchmarkRun;

/// One leaderboard table row, fully formatted.
#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub agent: String,
    pub coverage_median: String,
    pub intent_score: String,
    pub needle_badge: Option<Tag>,
    /// `None` renders as `-` (run has no needle eval at all).
    pub needle_score: Option<String>,
    pub unique_actions: Option<u64>,
    /// Deep-link fragments into the trajectory explorer.
    pub coverage_fragment: String,
    pub needle_fragment: Option<String>,
}

/// Build rows from runs already sorted by ascending rank.
pub fn leaderboard_rows(runs: &[BenchmarkRun]) -> Vec<LeaderboardRow> {
    runs.iter()
        .map(|run| {
            let needle = run.needle_eval.as_ref();
            LeaderboardRow {
                rank: run.rank,
                agent: run.agent.clone(),
                coverage_median: fmt_score(run.coverage_score.as_ref().and_then(|c| c.median)),
                intent_score: fmt_score(run.intent_eval.as_ref().and_then(|i| i.score)),
                needle_badge: needle
                    .and_then(|n| n.result.as_deref())
                    .and_then(needle_badge),
                needle_score: needle.map(|n| fmt_score(n.score)),
                unique_actions: run.coverage_score.as_ref().and_then(|c| c.unique_actions),
                coverage_fragment: format!("coverage-{}", run.coverage_run_id),
                needle_fragment: needle
                    .and_then(|n| n.run_id.as_deref())
                    .map(|id| format!("needle-{}", id)),
            }
        })
        .collect()
}

/// Chart data for the external chart collaborator. Serialized verbatim
/// into the page as a JSON block.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: &'static str,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub color: &'static str,
}

/// Grouped bars: coverage median and intent score per agent.
pub fn score_chart(runs: &[BenchmarkRun]) -> ChartSpec {
    ChartSpec {
        kind: "bar",
        labels: runs.iter().map(|r| r.agent.clone()).collect(),
        datasets: vec![
            ChartSeries {
                label: "Coverage median",
                data: runs
                    .iter()
                    .map(|r| r.coverage_score.as_ref().and_then(|c| c.median).unwrap_or(0.0))
                    .collect(),
                color: "#0f172a",
            },
            ChartSeries {
                label: "Intent score",
                data: runs
                    .iter()
                    .map(|r| r.intent_eval.as_ref().and_then(|i| i.score).unwrap_or(0.0))
                    .collect(),
                color: "#34d399",
            },
        ],
        suggested_max: None,
    }
}

/// Needle score per agent, with the fixed suggested axis maximum of 5.
pub fn needle_chart(runs: &[BenchmarkRun]) -> ChartSpec {
    ChartSpec {
        kind: "bar",
        labels: runs.iter().map(|r| r.agent.clone()).collect(),
        datasets: vec![ChartSeries {
            label: "Needle score",
            data: runs
                .iter()
                .map(|r| r.needle_eval.as_ref().and_then(|n| n.score).unwrap_or(0.0))
                .collect(),
            color: "#f97316",
        }],
        suggested_max: Some(5.0),
    }
}
