use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("README not found: {}", .0.display())]
    ReadmeNotFound(PathBuf),

    #[error("README progress block is out of date: {}", .0.display())]
    StaleReadme(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound(_)
                | Error::ConfigParse(_)
                | Error::Config(_)
                | Error::ReadmeNotFound(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Error::ConfigParse(_) => "CONFIG_PARSE",
            Error::Config(_) => "CONFIG",
            Error::ReadmeNotFound(_) => "README_NOT_FOUND",
            Error::StaleReadme(_) => "STALE_README",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
