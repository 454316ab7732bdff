use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::label::{Label, LabelAtom, parse_atoms};

/// Template a cloud can materialize a node from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudTemplate {
    /// Whitespace-separated labels the provisioned node would carry.
    #[serde(default)]
    pub labels: String,
}

impl CloudTemplate {
    pub fn new(labels: impl Into<String>) -> Self {
        Self {
            labels: labels.into(),
        }
    }

    pub fn atoms(&self) -> BTreeSet<LabelAtom> {
        parse_atoms(&self.labels)
    }
}

/// Elastic provider that can create nodes on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cloud {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<CloudTemplate>,
}

impl Cloud {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
        }
    }

    pub fn with_template(mut self, template: CloudTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Returns `true` if some template would produce a node matching `label`.
    pub fn can_provision(&self, label: &Label) -> bool {
        self.templates.iter().any(|t| label.matches(&t.atoms()))
    }
}
