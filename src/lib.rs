use std::path::PathBuf;

pub mod color;
pub mod config;
pub mod defaults;
pub mod editor;
pub mod merge;
pub mod model;
pub mod progress;
pub mod session;
pub mod store;
pub mod tenant;
pub mod theme;

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct Error {
    pub context: Box<ErrorContext>,
    pub detail: Box<ErrorDetail>,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub path: PathBuf,
    pub theme: Option<u32>,
}

impl ErrorContext {
    fn new(path: PathBuf) -> Self {
        Self { path, theme: None }
    }

    fn with_theme(&self, theme: u32) -> Self {
        Self {
            path: self.path.clone(),
            theme: Some(theme),
        }
    }

    fn error(&self, detail: ErrorDetail) -> Error {
        Error {
            context: Box::new(self.clone()),
            detail: Box::new(detail),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.theme {
            Some(theme) => write!(f, "theme {theme}({})", self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to read template: {0}")]
    ReadTemplate(std::io::Error),
    #[error("Failed to parse TOML document: {0}")]
    ParseToml(toml::de::Error),
    #[error("Failed to parse YAML document: {0}")]
    ParseYaml(serde_yaml::Error),
    #[error("Failed to parse JSON document: {0}")]
    ParseJson(serde_json::Error),
    #[error("Unsupported template format: {0:?}")]
    UnsupportedFormat(String),
    #[error("File name carries no theme number")]
    MissingThemeNumber,
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(glob::PatternError),
    #[error("Failed to walk glob: {0}")]
    Glob(glob::GlobError),
}
