use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The file parsed, but it does not have the shape we expect.
    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Write failed for {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<QuizError>,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl QuizError {
    /// Short type name of the underlying cause, as shown in error reports.
    pub fn cause_kind(&self) -> &'static str {
        match self {
            QuizError::Io(_) => "IoError",
            QuizError::Serialization(_) => "JsonError",
            QuizError::Xml(_) => "XmlError",
            QuizError::Malformed(_) => "MalformedData",
            QuizError::NotFound(_) => "NotFound",
            QuizError::Validation(_) => "ValidationError",
            QuizError::Config(_) => "ConfigError",
            QuizError::Write { .. } => "WriteError",
            QuizError::Store(_) => "StoreError",
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
