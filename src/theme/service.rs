//! Theme switch state machine
//!
//! Switching from theme N to M runs Backing up -> Clearing -> Applying or
//! Restoring -> Syncing, strictly in that order and without suspension.
//! Every step mutates state held by the caller, passed in as a
//! [`ThemeContext`].

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    defaults::DefaultDataRegistry,
    merge::deep_merge,
    model::{GlobalComponentsData, PageComponents, Representation, embedded_variant},
    progress::{NullReporter, PageStatus, ThemePhase, ThemeProgress},
    session::{EditorSession, GlobalSlot},
    tenant::TenantStore,
};

use super::{BackupKey, ThemeBackup, ThemeCatalog, ThemeError};

/// State a switch operates on.
pub struct ThemeContext<'a> {
    pub defaults: &'a DefaultDataRegistry,
    pub session: &'a mut EditorSession,
    pub tenant: &'a mut TenantStore,
    /// Page currently shown by the rendering surface.
    pub active_page: Option<&'a str>,
}

/// Summary of a completed switch or restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchOutcome {
    pub from_theme: Option<u32>,
    pub to_theme: u32,
    pub restored: bool,
    /// Key of the backup taken of the outgoing theme.
    pub backup_created: Option<String>,
    pub pages: usize,
    /// Session version once the switch has settled.
    pub version: u64,
}

/// Registers every component of `pages` in the session and installs each
/// page's list. Returns the shape of each page.
pub fn install_pages(
    session: &mut EditorSession,
    pages: impl IntoIterator<Item = (String, PageComponents)>,
    reporter: &dyn ThemeProgress,
) -> IndexMap<String, Representation> {
    let mut representations = IndexMap::new();
    for (page, components) in pages {
        representations.insert(page.clone(), components.representation());
        let components = components.into_components();
        for component in &components {
            session.ensure_component_variant(
                &component.kind,
                &component.id,
                component.data.clone(),
            );
            session.load_component_data(&component.kind, &component.id, component.data.clone());
        }
        debug!(page, components = components.len(), "installing page");
        reporter.update_page(
            &page,
            PageStatus::Installed {
                components: components.len(),
            },
        );
        session.set_page_components_for_page(&page, components);
    }
    representations
}

/// Installs header then footer, each as variant first and data second.
///
/// The stored object is laid over the variant's defaults and the variant
/// is stamped back into the result.
pub fn install_global(
    session: &mut EditorSession,
    defaults: &DefaultDataRegistry,
    global: &GlobalComponentsData,
) {
    for (slot, data) in [
        (GlobalSlot::Header, global.header.as_ref()),
        (GlobalSlot::Footer, global.footer.as_ref()),
    ] {
        let Some(data) = data else {
            continue;
        };
        let variant = embedded_variant(data)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}1", slot.kind()));
        let mut merged = defaults.default_data(slot.kind(), &variant);
        deep_merge(&mut merged, data);
        match merged.as_object_mut() {
            Some(object) => {
                object.insert("variant".into(), variant.clone().into());
            }
            None => {
                warn!(
                    slot = slot.kind(),
                    "header/footer data is not an object, using defaults"
                );
                merged = defaults.default_data(slot.kind(), &variant);
            }
        }
        session.set_global_variant(slot, variant);
        session.set_global_data(slot, merged);
    }
}

/// Moves an editing session between themes.
pub struct ThemeService {
    catalog: ThemeCatalog,
    backups: IndexMap<u32, ThemeBackup>,
    phase: ThemePhase,
    reporter: Arc<dyn ThemeProgress>,
}

impl std::fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeService")
            .field("catalog", &self.catalog)
            .field("backups", &self.backups.keys().collect::<Vec<_>>())
            .field("phase", &self.phase)
            .finish()
    }
}

impl ThemeService {
    pub fn new(catalog: ThemeCatalog) -> Self {
        Self {
            catalog,
            backups: IndexMap::new(),
            phase: ThemePhase::Idle,
            reporter: Arc::new(NullReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ThemeProgress>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> &ThemePhase {
        &self.phase
    }

    fn enter(&mut self, phase: ThemePhase) {
        debug!(?phase, "theme phase");
        self.reporter.set_phase(phase.clone());
        self.phase = phase;
    }

    /// Non-empty backup of `theme`, from the dedicated slot or, after a
    /// reload, from the tenant's layout settings.
    pub fn backup(&self, theme: u32, tenant: &TenantStore) -> Option<ThemeBackup> {
        if let Some(backup) = self.backups.get(&theme) {
            if !backup.is_empty() {
                return Some(backup.clone());
            }
        }
        tenant
            .website_layout()
            .settings
            .get(&BackupKey(theme).to_string())
            .and_then(ThemeBackup::from_value)
            .filter(|backup| !backup.is_empty())
    }

    /// Backup keys present in either store.
    pub fn backup_keys(&self, tenant: &TenantStore) -> Vec<BackupKey> {
        let mut keys = self
            .backups
            .keys()
            .map(|theme| BackupKey(*theme))
            .chain(
                tenant
                    .website_layout()
                    .settings
                    .keys()
                    .filter_map(|key| key.parse::<BackupKey>().ok()),
            )
            .collect::<Vec<_>>();
        keys.sort();
        keys.dedup();
        keys
    }

    fn store_backup(&mut self, theme: u32, backup: ThemeBackup, tenant: &mut TenantStore) {
        tenant
            .website_layout_mut()
            .settings
            .insert(BackupKey(theme).to_string(), backup.to_value());
        self.backups.insert(theme, backup);
    }

    fn consume_backup(&mut self, theme: u32, tenant: &mut TenantStore) {
        self.backups.shift_remove(&theme);
        tenant
            .website_layout_mut()
            .settings
            .remove(&BackupKey(theme).to_string());
    }

    /// Switches every page to `theme`, preferring the user's last state of
    /// that theme over its template.
    pub fn apply_theme_to_all_pages(
        &mut self,
        cx: ThemeContext<'_>,
        theme: u32,
    ) -> Result<SwitchOutcome, ThemeError> {
        let from_theme = cx.tenant.current_theme();
        let outgoing = from_theme.map(|current| {
            (current, ThemeBackup::capture(&*cx.session, &*cx.tenant))
        });
        let restorable = match &outgoing {
            Some((current, backup)) if *current == theme => !backup.is_empty(),
            _ => self.backup(theme, cx.tenant).is_some(),
        };
        if !restorable && !self.catalog.contains(theme) {
            self.enter(ThemePhase::Failed(format!("theme {theme} unavailable")));
            self.phase = ThemePhase::Idle;
            return Err(ThemeError::UnknownTheme(theme));
        }
        let ThemeContext {
            defaults,
            session,
            tenant,
            active_page,
        } = cx;

        let mut backup_created = None;
        if let Some((current, backup)) = outgoing {
            self.enter(ThemePhase::BackingUp);
            info!(
                key = %BackupKey(current),
                pages = backup.pages.len(),
                "backed up outgoing theme"
            );
            self.store_backup(current, backup, tenant);
            self.reporter
                .log_info(&format!("Saved theme {current} as {}", BackupKey(current)));
            backup_created = Some(BackupKey(current).to_string());
        }
        // looked up after backing up, so re-applying the current theme
        // restores the state just saved
        let restore = self.backup(theme, tenant);

        self.enter(ThemePhase::Clearing);
        session.clear_all_states();
        tenant.invalidate_pending_fetches();

        let (representations, restored) = match restore {
            Some(backup) => {
                self.enter(ThemePhase::Restoring);
                self.reporter
                    .log_info(&format!("Restoring your last edits of theme {theme}"));
                (self.install_backup(defaults, session, backup, active_page), true)
            }
            None => {
                self.enter(ThemePhase::Applying);
                let template = self
                    .catalog
                    .get(theme)
                    .cloned()
                    .ok_or(ThemeError::UnknownTheme(theme))?;
                (self.install_template(defaults, session, template), false)
            }
        };

        self.enter(ThemePhase::Syncing);
        tenant.sync_from_session(session, &representations);
        tenant.set_current_theme(theme);
        if restored {
            self.consume_backup(theme, tenant);
        }

        Ok(self.settle(SwitchOutcome {
            from_theme,
            to_theme: theme,
            restored,
            backup_created,
            pages: representations.len(),
            version: session.version(),
        }))
    }

    /// Restores the backup stored under `key` without backing up the
    /// current theme. Fails when no usable backup exists.
    pub fn restore_theme_from_backup(
        &mut self,
        cx: ThemeContext<'_>,
        key: BackupKey,
    ) -> Result<SwitchOutcome, ThemeError> {
        let Some(backup) = self.backup(key.theme(), cx.tenant) else {
            self.reporter.log_warn(&format!("{key} holds no backup"));
            self.enter(ThemePhase::Failed(format!("no backup under {key}")));
            self.phase = ThemePhase::Idle;
            return Err(ThemeError::MissingBackup(key));
        };
        let ThemeContext {
            defaults,
            session,
            tenant,
            active_page,
        } = cx;
        let from_theme = tenant.current_theme();

        self.enter(ThemePhase::Clearing);
        session.clear_all_states();
        tenant.invalidate_pending_fetches();

        self.enter(ThemePhase::Restoring);
        let representations = self.install_backup(defaults, session, backup, active_page);

        self.enter(ThemePhase::Syncing);
        tenant.sync_from_session(session, &representations);
        tenant.set_current_theme(key.theme());
        self.consume_backup(key.theme(), tenant);

        Ok(self.settle(SwitchOutcome {
            from_theme,
            to_theme: key.theme(),
            restored: true,
            backup_created: None,
            pages: representations.len(),
            version: session.version(),
        }))
    }

    fn install_template(
        &self,
        defaults: &DefaultDataRegistry,
        session: &mut EditorSession,
        template: super::ThemeTemplate,
    ) -> IndexMap<String, Representation> {
        let super::ThemeTemplate {
            component_settings,
            global_components_data,
        } = template;
        self.reporter
            .register_pages(component_settings.0.keys().cloned().collect());
        let representations = install_pages(session, component_settings.0, &*self.reporter);
        install_global(session, defaults, &global_components_data);
        representations
    }

    fn install_backup(
        &self,
        defaults: &DefaultDataRegistry,
        session: &mut EditorSession,
        backup: ThemeBackup,
        active_page: Option<&str>,
    ) -> IndexMap<String, Representation> {
        let ThemeBackup { pages, global } = backup;
        self.reporter.register_pages(pages.keys().cloned().collect());
        let representations = install_pages(session, pages, &*self.reporter);
        if let Some(global) = &global {
            install_global(session, defaults, global);
        }
        if let Some(page) = active_page {
            if session.refresh_page(page).is_some() {
                self.reporter.update_page(page, PageStatus::Refreshed);
            }
        }
        representations
    }

    fn settle(&mut self, outcome: SwitchOutcome) -> SwitchOutcome {
        self.enter(ThemePhase::Completed);
        self.reporter.finish();
        self.phase = ThemePhase::Idle;
        info!(?outcome, "theme switch settled");
        outcome
    }
}
