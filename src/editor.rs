//! Editing session facade
//!
//! [`Editor`] owns every piece of state one tenant's editing session needs
//! and exposes the operations the rendering surface and the settings panel
//! are allowed to call.

use std::sync::Arc;

use tracing::info;

use crate::{
    defaults::DefaultDataRegistry,
    merge::{MergeResolver, MergedConfig, ResolveRequest},
    model::{ComponentInstance, TenantData},
    progress::{NullReporter, ThemeProgress},
    session::EditorSession,
    store::TenantRepository,
    tenant::{FetchOutcome, FetchTicket, TenantStore},
    theme::{
        BackupKey, SwitchOutcome, ThemeCatalog, ThemeContext, ThemeError, ThemeService,
        install_global, install_pages,
    },
};

#[derive(Debug)]
pub struct Editor {
    defaults: DefaultDataRegistry,
    session: EditorSession,
    tenant: TenantStore,
    themes: ThemeService,
    active_page: Option<String>,
}

impl Editor {
    pub fn new(tenant: TenantStore, catalog: ThemeCatalog) -> Self {
        Self {
            defaults: DefaultDataRegistry::builtin(),
            session: EditorSession::new(),
            tenant,
            themes: ThemeService::new(catalog),
            active_page: None,
        }
    }

    pub fn with_defaults(mut self, defaults: DefaultDataRegistry) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ThemeProgress>) -> Self {
        self.themes = self.themes.with_reporter(reporter);
        self
    }

    pub fn defaults(&self) -> &DefaultDataRegistry {
        &self.defaults
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn tenant(&self) -> &TenantStore {
        &self.tenant
    }

    pub fn themes(&self) -> &ThemeService {
        &self.themes
    }

    pub fn into_tenant(self) -> TenantStore {
        self.tenant
    }

    /// Page currently shown; it is force-refreshed after a restore.
    pub fn active_page(&self) -> Option<&str> {
        self.active_page.as_deref()
    }

    pub fn set_active_page(&mut self, page: Option<String>) {
        self.active_page = page;
    }

    /// Seeds the session from the persisted tenant data. Returns the number
    /// of pages installed.
    pub fn hydrate(&mut self) -> usize {
        let data = self.tenant.data();
        let pages = data.component_settings.0.clone();
        let global = data.global_components_data.clone();
        let count = pages.len();
        install_pages(&mut self.session, pages, &NullReporter);
        install_global(&mut self.session, &self.defaults, &global);
        info!(
            tenant = self.tenant.tenant_id(),
            pages = count,
            "hydrated editor session"
        );
        count
    }

    pub fn default_data(&self, kind: &str, variant: &str) -> serde_json::Value {
        self.defaults.default_data(kind, variant)
    }

    pub fn ensure_component_variant(
        &mut self,
        kind: &str,
        id: &str,
        initial: serde_json::Value,
    ) -> bool {
        self.session.ensure_component_variant(kind, id, initial)
    }

    pub fn component_data(&self, kind: &str, id: &str) -> &serde_json::Value {
        self.session.component_data(kind, id)
    }

    pub fn set_component_data(&mut self, kind: &str, id: &str, data: serde_json::Value) -> u64 {
        self.session.set_component_data(kind, id, data)
    }

    pub fn set_page_components_for_page(
        &mut self,
        page: &str,
        components: Vec<ComponentInstance>,
    ) -> bool {
        self.session.set_page_components_for_page(page, components)
    }

    pub fn force_update_page_components(
        &mut self,
        page: &str,
        components: Vec<ComponentInstance>,
    ) -> u64 {
        self.session.force_update_page_components(page, components)
    }

    pub fn clear_all_states(&mut self) -> u64 {
        self.session.clear_all_states()
    }

    /// Final configuration of one component instance.
    pub fn resolve(&self, request: &ResolveRequest) -> MergedConfig {
        MergeResolver::new(&self.defaults, &self.tenant, &self.session).resolve(request)
    }

    /// Splits the editor into the theme service and the state it switches.
    fn theme_parts(&mut self) -> (&mut ThemeService, ThemeContext<'_>) {
        let Self {
            defaults,
            session,
            tenant,
            themes,
            active_page,
        } = self;
        let cx = ThemeContext {
            defaults,
            session,
            tenant,
            active_page: active_page.as_deref(),
        };
        (themes, cx)
    }

    pub fn apply_theme_to_all_pages(&mut self, theme: u32) -> Result<SwitchOutcome, ThemeError> {
        let (themes, cx) = self.theme_parts();
        themes.apply_theme_to_all_pages(cx, theme)
    }

    /// Restores the backup stored under `key` (`Theme<N>Backup`).
    pub fn restore_theme_from_backup(&mut self, key: &str) -> Result<SwitchOutcome, ThemeError> {
        let key = key.parse::<BackupKey>()?;
        let (themes, cx) = self.theme_parts();
        themes.restore_theme_from_backup(cx, key)
    }

    pub fn backup_keys(&self) -> Vec<BackupKey> {
        self.themes.backup_keys(&self.tenant)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.tenant.begin_fetch()
    }

    pub fn complete_fetch<E: std::fmt::Display>(
        &mut self,
        ticket: FetchTicket,
        result: Result<TenantData, E>,
    ) -> FetchOutcome {
        self.tenant.complete_fetch(ticket, result)
    }

    /// Fetches the tenant payload from `repository` and, once applied,
    /// hydrates the session from it. An unknown tenant starts out empty.
    pub async fn load<R>(&mut self, repository: &R) -> FetchOutcome
    where
        R: TenantRepository,
        R::Error: std::fmt::Display,
    {
        let ticket = self.tenant.begin_fetch();
        let result = repository
            .load(self.tenant.tenant_id())
            .await
            .map(Option::unwrap_or_default);
        let outcome = self.tenant.complete_fetch(ticket, result);
        if outcome == FetchOutcome::Applied {
            self.hydrate();
        }
        outcome
    }

    /// Writes the tenant data back. Returns `false` when nothing changed.
    pub async fn persist<R: TenantRepository>(&self, repository: &R) -> Result<bool, R::Error> {
        repository
            .save(self.tenant.tenant_id(), self.tenant.data())
            .await
    }
}
