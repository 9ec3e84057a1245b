use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("failed to parse tensor '{key}': {details}")]
    Parse { key: String, details: String },

    #[error("sample key '{0}' holds a value that cannot be read as a tensor")]
    UnsupportedValue(String),

    #[error("expected a JSON object mapping keys to tensors at the top level")]
    NotAnObject,
}

impl Error {
    pub fn parse(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Parse {
            key: key.into(),
            details: details.into(),
        }
    }
}
