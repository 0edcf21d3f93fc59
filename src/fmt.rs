//! Display formatting: scores, action labels, domain pills, needle badges.
//!
//! All pure. The HTML adapter in `render` turns pills and badges into
//! markup; nothing here emits tags.

use serde_json::Value;

use crate::model::{ActionSig, NeedleResult};

/// Fixed two-decimal score string; missing values render as zero.
pub fn fmt_score(n: Option<f64>) -> String {
    let x = n.unwrap_or(0.0);
    // Round half away from zero at two decimals before formatting, so
    // 0.005 becomes "0.01" rather than relying on the formatter's
    // banker's rounding.
    format!("{:.2}", (x * 100.0).round() / 100.0)
}

/// Coerce a loose JSON scalar (number, numeric string, null) to a score.
/// Anything unparseable counts as zero.
pub fn coerce_score(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Score string for a loose scalar, `fmt_score` semantics.
pub fn fmt_score_value(v: &Value) -> String {
    fmt_score(Some(coerce_score(v)))
}

/// Human-readable action signature:
/// `chain <id> · <action>[ · <protocol>][ (tok1 → tok2)]`.
pub fn action_label(sig: &ActionSig) -> String {
    let chain = match sig.chain_id {
        Some(id) => format!("chain {}", id),
        None => "chain ?".to_string(),
    };
    let action = sig.action.as_deref().unwrap_or("action");
    let protocol = sig
        .protocol
        .as_deref()
        .map(|p| format!(" · {}", p))
        .unwrap_or_default();
    let tokens = match &sig.tokens {
        Some(toks) if !toks.is_empty() => format!(" ({})", toks.join(" → ")),
        _ => String::new(),
    };
    format!("{} · {}{}{}", chain, action, protocol, tokens)
}

/// A classified tag ready for the HTML adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub class: &'static str,
    pub label: String,
}

/// Style class for a category domain, case-insensitive, with a default
/// class for categories the style sheet does not know. Empty input means
/// no pill at all.
pub fn domain_pill(name: &str) -> Option<Tag> {
    if name.is_empty() {
        return None;
    }
    let key = name.to_lowercase();
    let class = match key.as_str() {
        "dex" => "tag-dex",
        "lending" => "tag-lending",
        "yield" => "tag-yield",
        "bridge" => "tag-bridge",
        "derivatives" => "tag-derivatives",
        _ => "tag-default",
    };
    Some(Tag { class, label: key })
}

/// Badge for a needle result code. Unrecognized non-empty codes get the
/// warning class; underscores in the label become spaces. Empty input
/// renders as `-` upstream.
pub fn needle_badge(result: &str) -> Option<Tag> {
    if result.is_empty() {
        return None;
    }
    let key = result.to_uppercase();
    let class = match NeedleResult::parse(&key) {
        NeedleResult::Pass => "tag-pass",
        NeedleResult::PassWithWarnings | NeedleResult::Other => "tag-warning",
        NeedleResult::Partial => "tag-partial",
        NeedleResult::Fail => "tag-fail",
    };
    Some(Tag {
        class,
        label: key.replace('_', " "),
    })
}
