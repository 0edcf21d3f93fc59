//! benchsite: static leaderboard site generator for agent evaluation runs.
//!
//! Consumes precomputed JSON/JSONL artifacts from an evaluation pipeline
//! (a run manifest plus per-run transaction files) and emits a browsable
//! set of static pages: a leaderboard, a needle comparison table, and a
//! per-run trajectory explorer. All inputs are read-only; nothing here
//! computes scores.

pub mod bundle;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod fmt;
pub mod logging;
pub mod model;
pub mod render;
pub mod site;
pub mod source;
pub mod views;
