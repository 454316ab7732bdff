use serde::{Deserialize, Serialize};

use crate::{
    domain::{TriggerConfig, url::encode_segment},
    error::ModelResult,
    label::Label,
};

/// Input parameter declared by a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParameterDef {
    /// Parameter whose value is a label expression selecting the node to run on.
    #[serde(rename_all = "camelCase")]
    Label {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    String {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Other { name: String },
}

impl ParameterDef {
    pub fn label(name: impl Into<String>, default_value: Option<&str>) -> Self {
        Self::Label {
            name: name.into(),
            default_value: default_value.map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterDef::Label { name, .. }
            | ParameterDef::String { name, .. }
            | ParameterDef::Other { name } => name,
        }
    }
}

/// Job (project) as declared in the farm configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Assigned label expression as configured. `None` or blank means "run anywhere".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDef>,
    /// Build-step blocks triggering other jobs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<TriggerConfig>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            label: None,
            parameters: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDef) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerConfig) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Parse the assigned label. Blank labels are `Ok(None)`.
    pub fn assigned_label(&self) -> ModelResult<Option<Label>> {
        match self.label.as_deref() {
            None => Ok(None),
            Some(text) => Label::parse_optional(text),
        }
    }

    /// Returns `true` if the job declares a label parameter called `name`.
    pub fn has_label_parameter(&self, name: &str) -> bool {
        self.parameters
            .iter()
            .any(|p| matches!(p, ParameterDef::Label { name: n, .. } if n == name))
    }

    /// Default values of the job's label parameters.
    pub fn label_defaults(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(|p| match p {
            ParameterDef::Label {
                default_value: Some(value),
                ..
            } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Relative URL of the job page.
    pub fn url(&self) -> String {
        format!("job/{}/", encode_segment(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_label_means_anywhere() {
        assert!(Job::new("a").assigned_label().unwrap().is_none());
        assert!(Job::new("a").with_label(" ").assigned_label().unwrap().is_none());
        assert!(Job::new("a").with_label("x&&").assigned_label().is_err());

        let label = Job::new("a").with_label("x && y").assigned_label().unwrap();
        assert_eq!(label.unwrap().display_name(), "x&&y");
    }

    #[test]
    fn label_parameters_and_defaults() {
        let job = Job::new("deploy")
            .with_parameter(ParameterDef::label("NODE", Some("jdk7")))
            .with_parameter(ParameterDef::label("OTHER_NODE", None))
            .with_parameter(ParameterDef::String {
                name: "BRANCH".into(),
                default_value: Some("main".into()),
            });

        assert!(job.has_label_parameter("NODE"));
        assert!(job.has_label_parameter("OTHER_NODE"));
        assert!(!job.has_label_parameter("BRANCH"));
        assert_eq!(job.label_defaults().collect::<Vec<_>>(), vec!["jdk7"]);
    }

    #[test]
    fn deserializes_parameters_with_camel_case_fields() {
        let json = r#"{
            "name": "deploy",
            "label": "linux",
            "parameters": [{"type":"label","name":"NODE","defaultValue":"jdk7"}]
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.parameters, vec![ParameterDef::label("NODE", Some("jdk7"))]);
        assert!(job.triggers.is_empty());
    }

    #[test]
    fn url_encodes_name() {
        assert_eq!(Job::new("my job").url(), "job/my%20job/");
    }
}
