//! Run catalog: expands benchmark runs into addressable view targets.
//!
//! Every run yields a coverage option; runs with a hosted needle run
//! directory yield a second, needle option. Option ids double as deep-link
//! fragments (`coverage-<id>` / `needle-<id>`) and as page names, so they
//! must stay stable across rebuilds.

use crate::model::{BenchmarkRun, CoverageScore, NeedleEval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Coverage,
    Needle,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Coverage => "coverage",
            RunKind::Needle => "needle",
        }
    }
}

/// A derived, addressable view target built from one benchmark run.
#[derive(Debug, Clone)]
pub struct RunOption {
    pub id: String,
    pub kind: RunKind,
    /// Artifact directory, relative to the data root.
    pub path: String,
    pub run_id: String,
    pub agent: String,
    pub rank: u32,
    pub label: String,
    pub coverage_score: Option<CoverageScore>,
    pub needle: Option<NeedleEval>,
}

/// Sort runs ascending by rank (rank defines display order).
pub fn sort_runs(runs: &mut [BenchmarkRun]) {
    runs.sort_by_key(|r| r.rank);
}

/// Expand runs into the flat ordered catalog: run order preserved, each
/// coverage option directly before its sibling needle option.
pub fn build_catalog(runs: &[BenchmarkRun]) -> Vec<RunOption> {
    let mut options = Vec::new();
    for run in runs {
        options.push(RunOption {
            id: format!("coverage-{}", run.coverage_run_id),
            kind: RunKind::Coverage,
            path: run.coverage_run.clone(),
            run_id: run.coverage_run_id.clone(),
            agent: run.agent.clone(),
            rank: run.rank,
            label: format!("#{} · {} · Coverage", run.rank, run.agent),
            coverage_score: run.coverage_score.clone(),
            needle: run.needle_eval.clone(),
        });
        if let Some(needle) = &run.needle_eval {
            if let Some(run_dir) = &needle.run_dir {
                let run_id = needle
                    .run_id
                    .clone()
                    .unwrap_or_else(|| run.coverage_run_id.clone());
                let result = needle.result.as_deref().unwrap_or("?");
                options.push(RunOption {
                    id: format!("needle-{}", run_id),
                    kind: RunKind::Needle,
                    path: run_dir.clone(),
                    run_id,
                    agent: run.agent.clone(),
                    rank: run.rank,
                    label: format!("#{} · {} · Needle ({})", run.rank, run.agent, result),
                    coverage_score: run.coverage_score.clone(),
                    needle: run.needle_eval.clone(),
                });
            }
        }
    }
    options
}

/// Resolve a deep-link fragment to a catalog entry, defaulting to the
/// first option when the fragment is absent or unknown.
pub fn resolve_selection<'a>(
    catalog: &'a [RunOption],
    fragment: Option<&str>,
) -> Option<&'a RunOption> {
    fragment
        .and_then(|f| catalog.iter().find(|opt| opt.id == f))
        .or_else(|| catalog.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BenchmarkRun;

    fn run(rank: u32, agent: &str, needle: Option<NeedleEval>) -> BenchmarkRun {
        BenchmarkRun {
            rank,
            agent: agent.to_string(),
            coverage_run_id: format!("cov-{}", rank),
            coverage_run: format!("runs/cov-{}", rank),
            coverage_score: None,
            intent_eval: None,
            needle_eval: needle,
        }
    }

    fn needle(run_id: &str, run_dir: Option<&str>, result: &str) -> NeedleEval {
        NeedleEval {
            run_id: Some(run_id.to_string()),
            run_dir: run_dir.map(|s| s.to_string()),
            result: Some(result.to_string()),
            score: Some(4.0),
            dataset: None,
        }
    }

    #[test]
    fn one_option_without_needle_two_with_run_dir() {
        let runs = vec![
            run(1, "AgentA", Some(needle("n1", Some("runs/n1"), "PASS"))),
            run(2, "AgentB", None),
        ];
        let catalog = build_catalog(&runs);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].id, "coverage-cov-1");
        assert_eq!(catalog[1].id, "needle-n1");
        assert_eq!(catalog[2].id, "coverage-cov-2");
    }

    #[test]
    fn needle_eval_without_run_dir_emits_no_needle_option() {
        let runs = vec![run(1, "AgentA", Some(needle("n1", None, "FAIL")))];
        let catalog = build_catalog(&runs);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].kind, RunKind::Coverage);
    }

    #[test]
    fn labels_carry_rank_agent_and_result() {
        let runs = vec![run(3, "AgentC", Some(needle("n3", Some("runs/n3"), "PARTIAL")))];
        let catalog = build_catalog(&runs);
        assert_eq!(catalog[0].label, "#3 · AgentC · Coverage");
        assert_eq!(catalog[1].label, "#3 · AgentC · Needle (PARTIAL)");
    }

    #[test]
    fn coverage_precedes_sibling_needle_in_run_order() {
        let runs = vec![
            run(1, "A", Some(needle("na", Some("runs/na"), "PASS"))),
            run(2, "B", Some(needle("nb", Some("runs/nb"), "FAIL"))),
        ];
        let catalog = build_catalog(&runs);
        let ids: Vec<&str> = catalog.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["coverage-cov-1", "needle-na", "coverage-cov-2", "needle-nb"]);
    }

    #[test]
    fn selection_resolves_fragment_or_defaults_to_first() {
        let runs = vec![
            run(1, "A", Some(needle("na", Some("runs/na"), "PASS"))),
            run(2, "B", None),
        ];
        let catalog = build_catalog(&runs);
        assert_eq!(
            resolve_selection(&catalog, Some("needle-na")).unwrap().id,
            "needle-na"
        );
        assert_eq!(
            resolve_selection(&catalog, Some("needle-zzz")).unwrap().id,
            "coverage-cov-1"
        );
        assert_eq!(resolve_selection(&catalog, None).unwrap().id, "coverage-cov-1");
        assert!(resolve_selection(&[], Some("x")).is_none());
    }

    #[test]
    fn sort_runs_orders_by_rank() {
        let mut runs = vec![run(3, "C", None), run(1, "A", None), run(2, "B", None)];
        sort_runs(&mut runs);
        let ranks: Vec<u32> = runs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }
}
