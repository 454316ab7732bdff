use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("label syntax error in {input:?} at offset {offset}: {reason}")]
    Syntax {
        input: String,
        offset: usize,
        reason: String,
    },

    #[error("malformed property line: {0}")]
    MalformedProperty(String),

    #[error("unknown node mode: {0}")]
    UnknownNodeMode(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl ModelError {
    pub(crate) fn syntax(input: &str, offset: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            input: input.to_string(),
            offset,
            reason: reason.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
