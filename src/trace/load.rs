use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use super::model::{ExplanationNode, NodeKind, TraceRow, TraceStore, Verdict};
use super::parse::{RawNode, RawTrace, parse_trace_json};
use super::registry::SubformulaRegistry;

#[derive(Clone, Debug)]
pub struct LoadedTrace {
    pub store: TraceStore,
    pub registry: SubformulaRegistry,
}

pub fn load_trace(path: &Path) -> Result<LoadedTrace> {
    info!("loading trace from {}", path.display());

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace file {}", path.display()))?;
    let trace = parse_trace(&raw)
        .with_context(|| format!("failed to load trace file {}", path.display()))?;

    info!(
        "loaded {} time points over {} formula columns",
        trace.store.len(),
        trace.registry.len()
    );
    Ok(trace)
}

pub fn parse_trace(raw: &str) -> Result<LoadedTrace> {
    let RawTrace {
        columns,
        subformulas,
        explanations,
    } = parse_trace_json(raw)?;

    if !columns.is_empty() && columns.len() != subformulas.len() {
        bail!(
            "trace lists {} column headers but {} subformulas",
            columns.len(),
            subformulas.len()
        );
    }

    let entries = subformulas
        .into_iter()
        .enumerate()
        .map(|(index, subformula)| {
            let label = columns
                .get(index)
                .cloned()
                .or(subformula.label)
                .unwrap_or_else(|| subformula.id.clone());
            (subformula.id, label)
        })
        .collect::<Vec<_>>();
    let registry = SubformulaRegistry::new(entries).context("invalid subformula registry")?;

    let mut rows = Vec::with_capacity(explanations.len());
    for raw_row in explanations {
        if let Some(declared) = raw_row.explanation.tp
            && declared != raw_row.tp
        {
            bail!(
                "root explanation of tp {} declares tp {declared}",
                raw_row.tp
            );
        }

        rows.push(TraceRow {
            tp: raw_row.tp,
            ts: raw_row.ts,
            explanation: convert_node(raw_row.explanation, raw_row.tp),
        });
    }

    let store = TraceStore::new(rows).context("invalid trace rows")?;
    Ok(LoadedTrace { store, registry })
}

fn convert_node(raw: RawNode, parent_tp: usize) -> ExplanationNode {
    let tp = raw.tp.unwrap_or(parent_tp);
    let (kind, implied) = NodeKind::parse(&raw.kind);

    let explicit = raw.verdict.as_deref().and_then(|value| {
        let parsed = Verdict::parse(value);
        if parsed.is_none() {
            warn!(
                "ignoring unknown verdict `{value}` on formula `{}` at tp {tp}",
                raw.formula_id
            );
        }
        parsed
    });

    let children = raw
        .children
        .into_iter()
        .map(|child| convert_node(child, tp))
        .collect();

    ExplanationNode {
        kind,
        verdict: explicit.or(implied),
        formula_id: raw.formula_id,
        tp,
        children,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn sample() -> serde_json::Value {
        json!({
            "columns": ["Since(A,B)", "A", "B"],
            "subformulas": [
                { "id": "f0", "label": "phi" },
                { "id": "A", "label": "A" },
                { "id": "B", "label": "B" }
            ],
            "explanations": [
                { "tp": 0, "ts": 0, "explanation": { "kind": "VAtm", "formulaId": "f0" } },
                {
                    "tp": 1,
                    "ts": 2.5,
                    "explanation": {
                        "kind": "Since(A,B)",
                        "verdict": "satisfied",
                        "formulaId": "f0",
                        "children": [
                            { "kind": "SAtm", "formulaId": "B", "tp": 0 },
                            { "type": "SAtm", "formulaId": "A" }
                        ]
                    }
                }
            ]
        })
    }

    #[test]
    fn parses_rows_registry_and_defaults() {
        let trace = parse_trace(&sample().to_string()).unwrap();
        assert_eq!(trace.store.len(), 2);
        assert_eq!(trace.registry.len(), 3);
        assert_eq!(trace.registry.label(0), Some("Since(A,B)"));

        let row = trace.store.row_at(1).unwrap();
        assert_eq!(row.ts, 2.5);
        assert_eq!(row.explanation.kind, NodeKind::Since);
        assert_eq!(row.explanation.verdict, Some(Verdict::Satisfied));
        assert_eq!(row.explanation.children[0].tp, 0);
        // A child without a tp inherits its parent's.
        assert_eq!(row.explanation.children[1].tp, 1);
        assert_eq!(row.explanation.children[1].verdict, Some(Verdict::Satisfied));

        let first = trace.store.row_at(0).unwrap();
        assert_eq!(first.explanation.verdict, Some(Verdict::Violated));
        assert!(first.explanation.children.is_empty());
    }

    #[test]
    fn labels_fall_back_to_subformulas() {
        let mut raw = sample();
        raw["columns"] = json!([]);
        raw["subformulas"][2] = json!({ "id": "B" });
        let trace = parse_trace(&raw.to_string()).unwrap();
        assert_eq!(trace.registry.label(0), Some("phi"));
        assert_eq!(trace.registry.label(2), Some("B"));
    }

    #[test]
    fn unknown_verdict_strings_are_dropped() {
        let mut raw = sample();
        raw["explanations"][1]["explanation"]["verdict"] = json!("maybe");
        let trace = parse_trace(&raw.to_string()).unwrap();
        assert_eq!(trace.store.row_at(1).unwrap().explanation.verdict, None);
    }

    #[test]
    fn rejects_malformed_traces() {
        assert!(parse_trace("{ not json").is_err());
        assert!(parse_trace(r#"{ "subformulas": [] , "explanations": [] }"#).is_err());

        let mut mismatched = sample();
        mismatched["columns"] = json!(["only one"]);
        assert!(parse_trace(&mismatched.to_string()).is_err());

        let mut gap = sample();
        gap["explanations"][1]["tp"] = json!(4);
        assert!(parse_trace(&gap.to_string()).is_err());

        let mut root_tp = sample();
        root_tp["explanations"][0]["explanation"]["tp"] = json!(1);
        assert!(parse_trace(&root_tp.to_string()).is_err());

        let mut duplicate = sample();
        duplicate["subformulas"][2]["id"] = json!("A");
        assert!(parse_trace(&duplicate.to_string()).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", sample()).unwrap();

        let trace = load_trace(file.path()).unwrap();
        assert_eq!(trace.store.len(), 2);

        let missing = file.path().with_extension("missing");
        let error = load_trace(&missing).unwrap_err();
        assert!(format!("{error:#}").contains("failed to read trace file"));
    }
}
