use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unrecognized shift: '{0}'")]
    UnknownShift(String),
    #[error("unrecognized transfer status: '{0}'")]
    UnknownStatus(String),
    #[error("invalid identifier: '{0}'")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
