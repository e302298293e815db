use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrappleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Filetype '{0}' cannot be marked (listed in excluded_filetypes)")]
    ExcludedFiletype(String),

    #[error("The mark list cannot be added to itself")]
    ListBuffer,

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, GrappleError>;
