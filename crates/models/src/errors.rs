use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid argument: `{0}` must not be empty")]
    InvalidArgument(&'static str),
    #[error("property codec error: {0}")]
    Codec(String),
}
