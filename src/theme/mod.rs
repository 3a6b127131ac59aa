//! Theme switching
//!
//! Templates, backups and the service that moves an editing session from
//! one theme to another.

mod backup;
mod service;
mod template;

pub use backup::{BackupKey, GLOBAL_COMPONENTS_KEY, ThemeBackup};
pub use service::{SwitchOutcome, ThemeContext, ThemeService, install_global, install_pages};
pub use template::{ThemeCatalog, ThemeTemplate};

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("No backup stored under {0}")]
    MissingBackup(BackupKey),
    #[error("Theme {0} has neither a template nor a backup")]
    UnknownTheme(u32),
    #[error("Invalid backup key: {0}")]
    InvalidBackupKey(String),
}
