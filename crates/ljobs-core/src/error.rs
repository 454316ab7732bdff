use ljobs_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid label atom: {0:?}")]
    InvalidAtom(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type CoreResult<T> = Result<T, CoreError>;
