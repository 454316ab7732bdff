use serde::{Deserialize, Serialize};

/// Source of a label override used when one job triggers others.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TriggerParameter {
    /// Downstream jobs run on nodes matching `label`.
    #[serde(rename_all = "camelCase")]
    DirectOverride {
        #[serde(default)]
        label: Option<String>,
    },
    /// Downstream jobs run once on every node matching `label`.
    #[serde(rename_all = "camelCase")]
    AllNodesForLabel {
        #[serde(default)]
        label: Option<String>,
    },
    /// Free-form `KEY=value` lines passed to downstream jobs.
    ///
    /// A key only counts as a label when the downstream job declares a label parameter of that name.
    #[serde(rename_all = "camelCase")]
    PredefinedProperties {
        #[serde(default)]
        properties: String,
    },
}

/// One "trigger other projects" block of a job's build steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    /// Downstream job names; entries may themselves be comma-separated lists.
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<TriggerParameter>,
}

impl TriggerConfig {
    pub fn new<I, S>(projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            projects: projects.into_iter().map(Into::into).collect(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: TriggerParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Downstream job names, split on `,` and trimmed, empty entries dropped.
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects
            .iter()
            .flat_map(|p| p.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names_split_comma_lists() {
        let cfg = TriggerConfig::new(["a, b", " ", "c,,"]);
        assert_eq!(cfg.project_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn parameters_are_tagged() {
        let json = r#"[
            {"type":"directOverride","label":"jdk7"},
            {"type":"allNodesForLabel"},
            {"type":"predefinedProperties","properties":"NODE=x"}
        ]"#;
        let params: Vec<TriggerParameter> = serde_json::from_str(json).unwrap();
        assert_eq!(
            params,
            vec![
                TriggerParameter::DirectOverride {
                    label: Some("jdk7".into())
                },
                TriggerParameter::AllNodesForLabel { label: None },
                TriggerParameter::PredefinedProperties {
                    properties: "NODE=x".into()
                },
            ]
        );
    }
}
