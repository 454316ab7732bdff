use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        constants::{CONTROLLER_NAME, CONTROLLER_URL_SEGMENT},
        url::encode_segment,
    },
    error::{ModelError, ModelResult},
    label::{LabelAtom, parse_atoms},
};

/// How a node accepts jobs that carry no label.
///
/// Modes:
/// - `Normal`: runs unconstrained jobs as well as jobs whose label matches it.
/// - `Exclusive`: runs only jobs whose label explicitly matches it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeMode {
    #[default]
    Normal,
    Exclusive,
}

impl FromStr for NodeMode {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "normal" => Ok(NodeMode::Normal),
            "exclusive" => Ok(NodeMode::Exclusive),
            other => Err(ModelError::UnknownNodeMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for NodeMode {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NodeMode> for String {
    fn from(mode: NodeMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for NodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeMode::Normal => "normal",
            NodeMode::Exclusive => "exclusive",
        })
    }
}

/// Execution node as declared in the farm configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node name; also the node's self label.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whitespace-separated static labels from configuration.
    #[serde(default)]
    pub labels: String,
    #[serde(default)]
    pub mode: NodeMode,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            labels: String::new(),
            mode: NodeMode::Normal,
        }
    }

    /// The controller node with no static labels.
    pub fn controller() -> Self {
        Self::new(CONTROLLER_NAME)
    }

    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = labels.into();
        self
    }

    pub fn with_mode(mut self, mode: NodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_controller(&self) -> bool {
        self.name == CONTROLLER_NAME
    }

    pub fn is_exclusive(&self) -> bool {
        self.mode == NodeMode::Exclusive
    }

    /// Atom naming the node itself.
    pub fn self_label(&self) -> LabelAtom {
        LabelAtom::new(self.name.as_str())
    }

    /// Configured labels without the self label.
    pub fn static_atoms(&self) -> BTreeSet<LabelAtom> {
        let self_label = self.self_label();
        parse_atoms(&self.labels)
            .into_iter()
            .filter(|atom| *atom != self_label)
            .collect()
    }

    /// Atoms a label expression is evaluated against: static labels plus the self label.
    pub fn assigned_atoms(&self) -> BTreeSet<LabelAtom> {
        let mut atoms = parse_atoms(&self.labels);
        atoms.insert(self.self_label());
        atoms
    }

    /// Relative URL of the node's computer page.
    pub fn url(&self) -> String {
        if self.is_controller() {
            format!("computer/{CONTROLLER_URL_SEGMENT}/")
        } else {
            format!("computer/{}/", encode_segment(&self.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_atoms_include_self_label() {
        let node = Node::new("agent-1").with_labels("linux jdk7");
        let atoms: Vec<_> = node.assigned_atoms().into_iter().collect();
        assert_eq!(
            atoms,
            vec![
                LabelAtom::from("agent-1"),
                LabelAtom::from("jdk7"),
                LabelAtom::from("linux"),
            ]
        );
    }

    #[test]
    fn static_atoms_drop_self_label() {
        let node = Node::new("agent-1").with_labels("agent-1 linux");
        assert_eq!(
            node.static_atoms().into_iter().collect::<Vec<_>>(),
            vec![LabelAtom::from("linux")]
        );
    }

    #[test]
    fn display_name_falls_back_to_name() {
        let mut node = Node::new("agent-1");
        assert_eq!(node.display_name(), "agent-1");
        node.display_name = Some("Agent One".into());
        assert_eq!(node.display_name(), "Agent One");
    }

    #[test]
    fn urls_for_controller_and_agents() {
        assert_eq!(Node::controller().url(), "computer/(built-in)/");
        assert_eq!(Node::new("my agent").url(), "computer/my%20agent/");
    }

    #[test]
    fn mode_parses_and_defaults() {
        assert_eq!(NodeMode::default(), NodeMode::Normal);
        assert_eq!("EXCLUSIVE".parse::<NodeMode>().unwrap(), NodeMode::Exclusive);
        assert_eq!("".parse::<NodeMode>().unwrap(), NodeMode::Normal);
        assert!("sometimes".parse::<NodeMode>().is_err());
    }

    #[test]
    fn mode_deserializes_through_parsing() {
        let node: Node = serde_json::from_str(r#"{"name":"a","mode":" Exclusive "}"#).unwrap();
        assert!(node.is_exclusive());

        let err = serde_json::from_str::<Node>(r#"{"name":"a","mode":"sometimes"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown node mode"), "unexpected error: {err}");

        let json = serde_json::to_string(&Node::new("a").with_mode(NodeMode::Exclusive)).unwrap();
        assert!(json.contains(r#""mode":"exclusive""#), "unexpected json: {json}");
    }

    #[test]
    fn deserializes_with_defaults() {
        let node: Node = serde_json::from_str(r#"{"name":"a","mode":"exclusive"}"#).unwrap();
        assert!(node.is_exclusive());
        assert!(node.labels.is_empty());
        assert!(!node.is_controller());
    }
}
