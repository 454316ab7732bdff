use serde::{Deserialize, Serialize};

/// Per-atom settings from the label configuration page.
///
/// An atom with an entry has the linked-jobs page switched on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelConfig {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The description, unless it is blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_counts_as_none() {
        assert_eq!(LabelConfig::default().description(), None);
        assert_eq!(LabelConfig::default().with_description("  ").description(), None);
        assert_eq!(
            LabelConfig::default()
                .with_description(" JDK 7 build hosts ")
                .description(),
            Some("JDK 7 build hosts")
        );
    }
}
