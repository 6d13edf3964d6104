use anyhow::{Result, bail};

use crate::error::GridError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Satisfied,
    Violated,
}

impl Verdict {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "satisfied" | "sat" | "true" => Some(Self::Satisfied),
            "violated" | "viol" | "false" => Some(Self::Violated),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Violated => "violated",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    True,
    False,
    Atom,
    Neg,
    And,
    Or,
    Imp,
    Iff,
    Prev,
    Next,
    Once,
    Historically,
    Eventually,
    Always,
    Since,
    Until,
    Bare,
    Unrecognized(String),
}

impl NodeKind {
    const OPERATOR_PREFIXES: [(&'static str, NodeKind); 18] = [
        ("tt", NodeKind::True),
        ("ff", NodeKind::False),
        ("atm", NodeKind::Atom),
        ("atom", NodeKind::Atom),
        ("neg", NodeKind::Neg),
        ("not", NodeKind::Neg),
        ("and", NodeKind::And),
        ("or", NodeKind::Or),
        ("imp", NodeKind::Imp),
        ("iff", NodeKind::Iff),
        ("prev", NodeKind::Prev),
        ("next", NodeKind::Next),
        ("once", NodeKind::Once),
        ("historically", NodeKind::Historically),
        ("eventually", NodeKind::Eventually),
        ("always", NodeKind::Always),
        ("since", NodeKind::Since),
        ("until", NodeKind::Until),
    ];

    pub fn parse(raw: &str) -> (Self, Option<Verdict>) {
        let head = raw
            .trim()
            .split_once('(')
            .map(|(head, _)| head)
            .unwrap_or(raw.trim())
            .trim();
        let lower = head.to_ascii_lowercase();

        match lower.as_str() {
            "satisfied" => return (Self::Bare, Some(Verdict::Satisfied)),
            "violated" => return (Self::Bare, Some(Verdict::Violated)),
            "true" => return (Self::True, Some(Verdict::Satisfied)),
            "false" => return (Self::False, Some(Verdict::Violated)),
            _ => {}
        }

        if let Some(kind) = Self::match_operator(&lower) {
            return (kind, None);
        }

        let mut chars = head.chars();
        let polarity = match (chars.next(), chars.next()) {
            (Some('S'), Some(next)) if next.is_ascii_uppercase() => Some(Verdict::Satisfied),
            (Some('V'), Some(next)) if next.is_ascii_uppercase() => Some(Verdict::Violated),
            _ => None,
        };

        if let Some(verdict) = polarity
            && let Some(kind) = Self::match_operator(&lower[1..])
        {
            return (kind, Some(verdict));
        }

        (Self::Unrecognized(head.to_owned()), None)
    }

    fn match_operator(lower: &str) -> Option<Self> {
        Self::OPERATOR_PREFIXES
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|(_, kind)| kind.clone())
    }

    pub fn is_temporal(&self) -> bool {
        match self {
            Self::Prev
            | Self::Next
            | Self::Once
            | Self::Historically
            | Self::Eventually
            | Self::Always
            | Self::Since
            | Self::Until => true,
            Self::True
            | Self::False
            | Self::Atom
            | Self::Neg
            | Self::And
            | Self::Or
            | Self::Imp
            | Self::Iff
            | Self::Bare => false,
            // Unknown operators get the benefit of the doubt.
            Self::Unrecognized(_) => true,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Atom => "atom",
            Self::Neg => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Imp => "implies",
            Self::Iff => "iff",
            Self::Prev => "previous",
            Self::Next => "next",
            Self::Once => "once",
            Self::Historically => "historically",
            Self::Eventually => "eventually",
            Self::Always => "always",
            Self::Since => "since",
            Self::Until => "until",
            Self::Bare => "verdict",
            Self::Unrecognized(name) => name.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExplanationNode {
    pub kind: NodeKind,
    pub verdict: Option<Verdict>,
    pub formula_id: String,
    pub tp: usize,
    pub children: Vec<ExplanationNode>,
}

impl ExplanationNode {
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ExplanationNode::node_count)
            .sum::<usize>()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceRow {
    pub tp: usize,
    pub ts: f64,
    pub explanation: ExplanationNode,
}

/// Ordered, immutable rows of one monitor run. Row `i` always has `tp == i`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceStore {
    rows: Vec<TraceRow>,
}

impl TraceStore {
    pub fn new(rows: Vec<TraceRow>) -> Result<Self> {
        validate_rows(&rows, 0, None)?;
        Ok(Self { rows })
    }

    pub fn extended(&self, rows: Vec<TraceRow>) -> Result<Self> {
        let last_ts = self.rows.last().map(|row| row.ts);
        validate_rows(&rows, self.rows.len(), last_ts)?;

        let mut combined = Vec::with_capacity(self.rows.len() + rows.len());
        combined.extend(self.rows.iter().cloned());
        combined.extend(rows);
        Ok(Self { rows: combined })
    }

    pub fn row_at(&self, tp: usize) -> Result<&TraceRow, GridError> {
        self.rows.get(tp).ok_or(GridError::UnknownTimePoint { tp })
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn validate_rows(rows: &[TraceRow], first_tp: usize, previous_ts: Option<f64>) -> Result<()> {
    let mut previous_ts = previous_ts;

    for (offset, row) in rows.iter().enumerate() {
        let expected = first_tp + offset;
        if row.tp != expected {
            bail!("trace rows must have dense time points: expected tp {expected}, found {}", row.tp);
        }

        if !row.ts.is_finite() {
            bail!("timestamp of tp {} is not a finite number", row.tp);
        }

        if let Some(previous) = previous_ts
            && row.ts < previous
        {
            bail!(
                "timestamps must not decrease: tp {} has ts {} after ts {previous}",
                row.tp,
                row.ts
            );
        }
        previous_ts = Some(row.ts);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tp: usize) -> ExplanationNode {
        ExplanationNode {
            kind: NodeKind::Bare,
            verdict: Some(Verdict::Satisfied),
            formula_id: "p".to_owned(),
            tp,
            children: Vec::new(),
        }
    }

    fn row(tp: usize, ts: f64) -> TraceRow {
        TraceRow {
            tp,
            ts,
            explanation: leaf(tp),
        }
    }

    #[test]
    fn parses_polarity_prefixed_kinds() {
        assert_eq!(
            NodeKind::parse("SSince"),
            (NodeKind::Since, Some(Verdict::Satisfied))
        );
        assert_eq!(
            NodeKind::parse("VUntilInf"),
            (NodeKind::Until, Some(Verdict::Violated))
        );
        assert_eq!(NodeKind::parse("SAtm"), (NodeKind::Atom, Some(Verdict::Satisfied)));
        assert_eq!(NodeKind::parse("VOr"), (NodeKind::Or, Some(Verdict::Violated)));
        assert_eq!(NodeKind::parse("STT"), (NodeKind::True, Some(Verdict::Satisfied)));
    }

    #[test]
    fn parses_plain_and_bare_kinds() {
        assert_eq!(NodeKind::parse("Since(A,B)"), (NodeKind::Since, None));
        assert_eq!(NodeKind::parse("once"), (NodeKind::Once, None));
        assert_eq!(NodeKind::parse("Violated"), (NodeKind::Bare, Some(Verdict::Violated)));
        assert_eq!(NodeKind::parse("true"), (NodeKind::True, Some(Verdict::Satisfied)));
        assert_eq!(
            NodeKind::parse("Frobnicate"),
            (NodeKind::Unrecognized("Frobnicate".to_owned()), None)
        );
    }

    #[test]
    fn temporal_classification() {
        assert!(NodeKind::Since.is_temporal());
        assert!(NodeKind::Prev.is_temporal());
        assert!(!NodeKind::And.is_temporal());
        assert!(!NodeKind::Bare.is_temporal());
    }

    #[test]
    fn store_rejects_gaps_and_decreasing_timestamps() {
        assert!(TraceStore::new(vec![row(0, 1.0), row(2, 2.0)]).is_err());
        assert!(TraceStore::new(vec![row(1, 1.0)]).is_err());
        assert!(TraceStore::new(vec![row(0, 5.0), row(1, 4.0)]).is_err());
        assert!(TraceStore::new(vec![row(0, 5.0), row(1, 5.0), row(2, 9.5)]).is_ok());
    }

    #[test]
    fn row_lookup_reports_unknown_time_points() {
        let store = TraceStore::new(vec![row(0, 0.0), row(1, 3.0)]).unwrap();
        assert_eq!(store.row_at(1).unwrap().ts, 3.0);
        assert_eq!(
            store.row_at(2).unwrap_err(),
            GridError::UnknownTimePoint { tp: 2 }
        );
    }

    #[test]
    fn extension_continues_time_points() {
        let store = TraceStore::new(vec![row(0, 0.0), row(1, 3.0)]).unwrap();
        let extended = store.extended(vec![row(2, 3.5)]).unwrap();
        assert_eq!(extended.len(), 3);
        assert_eq!(store.len(), 2);

        assert!(store.extended(vec![row(3, 4.0)]).is_err());
        assert!(store.extended(vec![row(2, 1.0)]).is_err());
    }

    #[test]
    fn counts_nodes() {
        let mut root = leaf(0);
        root.children = vec![leaf(0), leaf(0)];
        root.children[0].children.push(leaf(0));
        assert_eq!(root.node_count(), 4);
    }
}
