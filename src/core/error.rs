use std::fmt;

/// Error types for markdash operations
#[derive(Debug)]
pub enum MarkdashError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// CSV parsing error
    Csv(csv::Error),

    /// HTTP client error
    Http(reqwest::Error),

    /// Remote source answered with an error or unusable body
    Remote(String),

    /// Config file is not valid TOML for `Config`
    TomlParsing {
        path: String,
        source: toml::de::Error,
    },

    /// JSON serialization error
    Json(serde_json::Error),

    /// File not found error
    FileNotFound(String),

    /// Invalid argument error
    InvalidArgument(String),

    /// File walking/ignore error
    FileWalking(ignore::Error),

    /// A required column is absent from a table
    MissingColumn { column: String, available: Vec<String> },

    /// A table has no usable rows
    EmptyTable(String),
}

impl fmt::Display for MarkdashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkdashError::Io(err) => write!(f, "IO error: {err}"),
            MarkdashError::Config(msg) => write!(f, "Configuration error: {msg}"),
            MarkdashError::Csv(err) => write!(f, "CSV error: {err}"),
            MarkdashError::Http(err) => write!(f, "HTTP error: {err}"),
            MarkdashError::Remote(msg) => write!(f, "Remote source error: {msg}"),
            MarkdashError::TomlParsing { path, source } => {
                write!(f, "TOML parsing error in '{path}': {source}")
            }
            MarkdashError::Json(err) => write!(f, "JSON error: {err}"),
            MarkdashError::FileNotFound(path) => write!(f, "File not found: {path}"),
            MarkdashError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            MarkdashError::FileWalking(err) => write!(f, "File walking error: {err}"),
            MarkdashError::MissingColumn { column, available } => write!(
                f,
                "Missing column: '{column}' (available: {})",
                available.join(", ")
            ),
            MarkdashError::EmptyTable(label) => write!(f, "Empty table: {label} has no rows"),
        }
    }
}

impl std::error::Error for MarkdashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarkdashError::Io(err) => Some(err),
            MarkdashError::Csv(err) => Some(err),
            MarkdashError::Http(err) => Some(err),
            MarkdashError::TomlParsing { source, .. } => Some(source),
            MarkdashError::Json(err) => Some(err),
            MarkdashError::FileWalking(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MarkdashError {
    fn from(err: std::io::Error) -> Self {
        MarkdashError::Io(err)
    }
}

impl From<csv::Error> for MarkdashError {
    fn from(err: csv::Error) -> Self {
        MarkdashError::Csv(err)
    }
}

impl From<reqwest::Error> for MarkdashError {
    fn from(err: reqwest::Error) -> Self {
        MarkdashError::Http(err)
    }
}

impl From<serde_json::Error> for MarkdashError {
    fn from(err: serde_json::Error) -> Self {
        MarkdashError::Json(err)
    }
}

impl From<ignore::Error> for MarkdashError {
    fn from(err: ignore::Error) -> Self {
        MarkdashError::FileWalking(err)
    }
}

/// Type alias for Results using MarkdashError
pub type Result<T> = std::result::Result<T, MarkdashError>;
