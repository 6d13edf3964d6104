use crate::trace::{ExplanationNode, NodeKind, Verdict};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellColor {
    Satisfied,
    Violated,
    #[default]
    Neutral,
}

impl CellColor {
    pub fn label(self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Violated => "violated",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VerdictColorMap;

impl VerdictColorMap {
    pub fn color(&self, node: &ExplanationNode) -> CellColor {
        match node.kind {
            NodeKind::Unrecognized(_) => CellColor::Neutral,
            _ => self.verdict_color(node.verdict),
        }
    }

    pub fn verdict_color(&self, verdict: Option<Verdict>) -> CellColor {
        match verdict {
            Some(Verdict::Satisfied) => CellColor::Satisfied,
            Some(Verdict::Violated) => CellColor::Violated,
            None => CellColor::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_of_kind(name: &str) -> ExplanationNode {
        let (kind, verdict) = NodeKind::parse(name);
        ExplanationNode {
            kind,
            verdict,
            formula_id: "f".to_owned(),
            tp: 0,
            children: Vec::new(),
        }
    }

    #[test]
    fn kinds_map_to_colors() {
        let colors = VerdictColorMap;
        assert_eq!(colors.color(&node_of_kind("SSince")), CellColor::Satisfied);
        assert_eq!(colors.color(&node_of_kind("VAtm")), CellColor::Violated);
        assert_eq!(colors.color(&node_of_kind("Violated")), CellColor::Violated);
        assert_eq!(colors.color(&node_of_kind("Until")), CellColor::Neutral);
        assert_eq!(colors.color(&node_of_kind("???")), CellColor::Neutral);
        assert_eq!(colors.color(&node_of_kind("")), CellColor::Neutral);
    }

    #[test]
    fn unrecognized_nodes_stay_neutral() {
        let node = ExplanationNode {
            kind: NodeKind::Unrecognized("Weird".to_owned()),
            verdict: Some(Verdict::Satisfied),
            formula_id: "f".to_owned(),
            tp: 0,
            children: Vec::new(),
        };
        assert_eq!(VerdictColorMap.color(&node), CellColor::Neutral);
    }
}
