//! Theme backups
//!
//! A backup is a flat map from page slug to that page's components, in the
//! shape the tenant persisted the page in, plus the header/footer snapshot
//! under [`GLOBAL_COMPONENTS_KEY`].

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    model::{GlobalComponentsData, PageComponents, Representation},
    session::EditorSession,
    tenant::TenantStore,
};

use super::ThemeError;

pub const GLOBAL_COMPONENTS_KEY: &str = "_globalComponentsData";

/// `Theme<N>Backup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackupKey(pub u32);

impl BackupKey {
    pub fn theme(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BackupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Theme{}Backup", self.0)
    }
}

impl FromStr for BackupKey {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("Theme")
            .and_then(|rest| rest.strip_suffix("Backup"))
            .and_then(|number| number.parse().ok())
            .map(Self)
            .ok_or_else(|| ThemeError::InvalidBackupKey(s.to_owned()))
    }
}

/// Snapshot of a whole theme's pages and header/footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeBackup {
    pub pages: IndexMap<String, PageComponents>,
    pub global: Option<GlobalComponentsData>,
}

impl ThemeBackup {
    /// Snapshots the session, live edits included. Each page keeps the shape
    /// the tenant persisted it in.
    pub fn capture(session: &EditorSession, tenant: &TenantStore) -> Self {
        let pages = session
            .snapshot_pages()
            .into_iter()
            .map(|(page, components)| {
                let representation = tenant.page_representation(&page).unwrap_or_default();
                let components = PageComponents::from_components(representation, components);
                (page, components)
            })
            .collect();
        let global = Some(session.global_components_data()).filter(|global| !global.is_empty());
        Self { pages, global }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.global.as_ref().is_none_or(GlobalComponentsData::is_empty)
    }

    pub fn representations(&self) -> IndexMap<String, Representation> {
        self.pages
            .iter()
            .map(|(page, components)| (page.clone(), components.representation()))
            .collect()
    }

    pub fn to_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (page, components) in &self.pages {
            match serde_json::to_value(components) {
                Ok(value) => {
                    map.insert(page.clone(), value);
                }
                Err(error) => warn!(page, %error, "failed to serialize backup page"),
            }
        }
        if let Some(global) = &self.global {
            match serde_json::to_value(global) {
                Ok(value) => {
                    map.insert(GLOBAL_COMPONENTS_KEY.to_owned(), value);
                }
                Err(error) => warn!(%error, "failed to serialize backup header/footer"),
            }
        }
        serde_json::Value::Object(map)
    }

    /// Reads a stored backup. Anything but an object holds no backup.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let entries = value.as_object()?;
        let mut backup = Self::default();
        for (key, value) in entries {
            if key == GLOBAL_COMPONENTS_KEY {
                match serde_json::from_value::<GlobalComponentsData>(value.clone()) {
                    Ok(global) => backup.global = Some(global),
                    Err(error) => warn!(%error, "ignoring malformed backup header/footer"),
                }
            } else {
                backup
                    .pages
                    .insert(key.clone(), PageComponents::from_value(key, value.clone()));
            }
        }
        Some(backup)
    }
}

impl Serialize for ThemeBackup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ThemeBackup {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("theme backup must be an object"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_key_round_trips_through_text() {
        let key: BackupKey = "Theme12Backup".parse().unwrap();
        assert_eq!(key, BackupKey(12));
        assert_eq!(key.to_string(), "Theme12Backup");
        assert!("Theme1".parse::<BackupKey>().is_err());
        assert!("ThemeXBackup".parse::<BackupKey>().is_err());
    }

    #[test]
    fn empty_object_is_an_empty_backup() {
        let backup = ThemeBackup::from_value(&serde_json::json!({})).unwrap();
        assert!(backup.is_empty());
        assert!(ThemeBackup::from_value(&serde_json::Value::Null).is_none());
    }
}
