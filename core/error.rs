use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid configuration in '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("YAML Serialization Error: {0}")]
    YamlError(#[from] serde_yml::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Walk Error: Path '{path}', Error: {message}")]
    WalkDir { path: PathBuf, message: String },

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::WalkDir {
            path: err.path().map(PathBuf::from).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}
