use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawTrace {
    #[serde(default)]
    pub(super) columns: Vec<String>,
    pub(super) subformulas: Vec<RawSubformula>,
    pub(super) explanations: Vec<RawRow>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawSubformula {
    pub(super) id: String,
    #[serde(default)]
    pub(super) label: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawRow {
    pub(super) tp: usize,
    pub(super) ts: f64,
    pub(super) explanation: RawNode,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawNode {
    #[serde(alias = "type")]
    pub(super) kind: String,
    pub(super) formula_id: String,
    #[serde(default)]
    pub(super) tp: Option<usize>,
    #[serde(default)]
    pub(super) verdict: Option<String>,
    #[serde(default)]
    pub(super) children: Vec<RawNode>,
}

pub(super) fn parse_trace_json(raw: &str) -> Result<RawTrace> {
    serde_json::from_str(raw).context("invalid trace JSON")
}
