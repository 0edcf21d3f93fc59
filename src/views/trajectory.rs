//! Trajectory explorer view: per-transaction rows joined with their raw
//! records, plus the run-info banner and per-row detail payloads.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::catalog::{RunKind, RunOption};
use crate::fmt::{action_label, domain_pill, fmt_score, fmt_score_value, needle_badge, Tag};
use crate::model::TxSummary;
use crate::source::RunData;

/// One explorer table row.
#[derive(Debug, Clone)]
pub struct TxRow {
    pub digest: String,
    pub domains: Vec<Tag>,
    pub actions: Vec<String>,
    pub bonus: String,
    pub penalty: String,
    /// Full joined JSON shown by the detail view.
    pub detail: Value,
}

/// One segment of the run-info banner; segments join with ` · `.
#[derive(Debug, Clone)]
pub struct InfoPart {
    pub text: String,
    pub badge: Option<Tag>,
}

impl InfoPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            badge: None,
        }
    }
}

/// Index raw transaction records by their digest key. Records without a
/// usable key are unreachable from the detail view but keep their slot
/// in the file; they are simply not indexed.
pub fn join_raw(raw: &[Value]) -> HashMap<String, &Value> {
    let mut by_digest = HashMap::new();
    for record in raw {
        let key = record
            .get("intent_id")
            .and_then(|v| v.as_str())
            .or_else(|| record.get("digest").and_then(|v| v.as_str()));
        if let Some(key) = key {
            by_digest.entry(key.to_string()).or_insert(record);
        }
    }
    by_digest
}

/// Detail payload for one transaction: summary plus joined raw record
/// plus run context. A missing raw record stays null rather than failing.
pub fn detail_payload(
    summary: &TxSummary,
    raw: Option<&Value>,
    needle: Option<&Value>,
    option: Option<&RunOption>,
) -> Value {
    json!({
        "summary": summary,
        "raw": raw.cloned().unwrap_or(Value::Null),
        "needle": needle.cloned().unwrap_or(Value::Null),
        "meta": option.map(|opt| json!({
            "id": opt.id,
            "agent": opt.agent,
            "type": opt.kind.as_str(),
        })).unwrap_or(Value::Null),
    })
}

/// Build explorer rows: one per summary, in file order.
pub fn tx_rows(data: &RunData, option: Option<&RunOption>) -> Vec<TxRow> {
    let by_digest = join_raw(&data.raw);
    data.summaries
        .iter()
        .map(|summary| {
            let digest = summary.key().to_string();
            TxRow {
                domains: summary
                    .domains
                    .iter()
                    .filter_map(|d| domain_pill(d))
                    .collect(),
                actions: summary.actions.iter().map(action_label).collect(),
                bonus: fmt_score_value(&summary.bonus),
                penalty: fmt_score_value(&summary.penalty),
                detail: detail_payload(
                    summary,
                    by_digest.get(&digest).copied(),
                    data.needle.as_ref(),
                    option,
                ),
                digest,
            }
        })
        .collect()
}

/// Compose the run-info banner. Hosted runs lead with rank and agent;
/// uploaded bundles show a generic label. Score sidecar and bench
/// version append when present.
pub fn run_info(option: Option<&RunOption>, data: &RunData) -> Vec<InfoPart> {
    let mut parts = Vec::new();
    let mut has_needle_score = false;

    if let Some(opt) = option {
        parts.push(InfoPart::text(format!("#{} · {}", opt.rank, opt.agent)));
        let run_label = match opt.kind {
            RunKind::Coverage => "Coverage run",
            RunKind::Needle => "Needle run",
        };
        let result = if opt.kind == RunKind::Needle {
            opt.needle
                .as_ref()
                .and_then(|n| n.result.clone())
                .or_else(|| {
                    data.needle
                        .as_ref()
                        .and_then(|n| n.get("result"))
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string())
                })
        } else {
            None
        };
        parts.push(InfoPart {
            text: run_label.to_string(),
            badge: result.as_deref().and_then(needle_badge),
        });
        if let Some(median) = opt.coverage_score.as_ref().and_then(|c| c.median) {
            parts.push(InfoPart::text(format!(
                "Coverage median {}",
                fmt_score(Some(median))
            )));
        }
        if let Some(score) = opt.needle.as_ref().and_then(|n| n.score) {
            parts.push(InfoPart::text(format!("Needle {}", fmt_score(Some(score)))));
            has_needle_score = true;
        }
    } else {
        parts.push(InfoPart::text("Uploaded run"));
    }

    if let Some(score) = &data.score {
        if let Some(final_score) = score.final_score {
            parts.push(InfoPart::text(format!(
                "Final score {}",
                fmt_score(Some(final_score))
            )));
        }
        if let Some(bonus) = score.bonus {
            parts.push(InfoPart::text(format!("Bonus {}", fmt_score(Some(bonus)))));
        }
    }
    if !has_needle_score {
        if let Some(score) = data
            .needle
            .as_ref()
            .and_then(|n| n.get("score"))
            .and_then(|v| v.as_f64())
        {
            parts.push(InfoPart::text(format!("Needle {}", fmt_score(Some(score)))));
        }
    }
    if let Some(version) = data.meta.as_ref().and_then(|m| m.bench_version.as_deref()) {
        parts.push(InfoPart::text(format!("Bench {}", version)));
    }
    parts
}
