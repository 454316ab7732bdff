use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Cloud, Job, LabelConfig, Node},
    error::{ModelError, ModelResult},
    label::LabelAtom,
};

/// Optional integrations that make trigger-time label overrides possible.
///
/// When either one is missing, trigger and default-value analysis yields nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Integrations {
    /// Downstream triggering with parameters.
    pub parameterized_trigger: bool,
    /// Label-typed job parameters.
    pub node_label_parameter: bool,
}

impl Integrations {
    pub const fn all() -> Self {
        Self {
            parameterized_trigger: true,
            node_label_parameter: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            parameterized_trigger: false,
            node_label_parameter: false,
        }
    }

    pub const fn trigger_labels_available(&self) -> bool {
        self.parameterized_trigger && self.node_label_parameter
    }
}

impl Default for Integrations {
    fn default() -> Self {
        Self::all()
    }
}

/// Point-in-time copy of the farm configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSnapshot {
    #[serde(default = "Node::controller")]
    pub controller: Node,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub clouds: Vec<Cloud>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub integrations: Integrations,
    /// Atoms with the linked-jobs page switched on, keyed by atom.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<LabelAtom, LabelConfig>,
}

impl Default for FarmSnapshot {
    fn default() -> Self {
        Self {
            controller: Node::controller(),
            nodes: Vec::new(),
            clouds: Vec::new(),
            jobs: Vec::new(),
            integrations: Integrations::default(),
            labels: BTreeMap::new(),
        }
    }
}

impl FarmSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(mut self, controller: Node) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_cloud(mut self, cloud: Cloud) -> Self {
        self.clouds.push(cloud);
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_integrations(mut self, integrations: Integrations) -> Self {
        self.integrations = integrations;
        self
    }

    pub fn with_label_config(mut self, atom: impl Into<LabelAtom>, config: LabelConfig) -> Self {
        self.labels.insert(atom.into(), config);
        self
    }

    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::InvalidSnapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_controller_only() {
        let snapshot = FarmSnapshot::from_json("{}").unwrap();
        assert!(snapshot.controller.is_controller());
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.integrations.trigger_labels_available());
    }

    #[test]
    fn label_configs_are_keyed_by_atom() {
        let json = r#"{"labels": {"jdk7": {"description": "JDK 7 hosts"}, "docker": {}}}"#;
        let snapshot = FarmSnapshot::from_json(json).unwrap();

        let jdk7 = &snapshot.labels[&LabelAtom::from("jdk7")];
        assert_eq!(jdk7.description(), Some("JDK 7 hosts"));
        assert_eq!(snapshot.labels[&LabelAtom::from("docker")], LabelConfig::default());
    }

    #[test]
    fn partial_integrations_disable_trigger_labels() {
        let json = r#"{"integrations": {"nodeLabelParameter": false}}"#;
        let snapshot = FarmSnapshot::from_json(json).unwrap();
        assert!(snapshot.integrations.parameterized_trigger);
        assert!(!snapshot.integrations.trigger_labels_available());
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = FarmSnapshot::from_json(r#"{"nodes": 3}"#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSnapshot(_)));
    }
}
