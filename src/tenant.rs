//! Persisted tenant store
//!
//! Holds the tenant data as last fetched from the backend, an index over its
//! components and the generation counter used to discard stale fetches.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{info, trace, warn};

use crate::{
    model::{
        BrandingColors, ComponentInstance, ComponentSettings, PageComponents, Representation,
        TenantData, WebsiteLayout,
    },
    session::EditorSession,
};

/// Lookup key into the persisted components.
///
/// `page` and `id` are optional filters; a key without them matches the
/// first component of that type and name in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub page: Option<String>,
    pub kind: String,
    pub component_name: String,
    pub id: Option<String>,
}

impl ComponentKey {
    pub fn new(kind: impl Into<String>, component_name: impl Into<String>) -> Self {
        Self {
            page: None,
            kind: kind.into(),
            component_name: component_name.into(),
            id: None,
        }
    }

    pub fn on_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Precomputed index over persisted components.
///
/// Every component is filed under all four filter combinations; the first
/// component in scan order (pages as persisted, components by position)
/// wins each key.
#[derive(Debug, Clone, Default)]
pub struct TenantIndex {
    entries: HashMap<ComponentKey, serde_json::Value>,
}

impl TenantIndex {
    pub fn build(settings: &ComponentSettings) -> Self {
        let mut entries = HashMap::new();
        for (page, components) in settings.pages() {
            for component in components.clone().into_components() {
                let ComponentInstance {
                    id,
                    kind,
                    component_name,
                    data,
                    ..
                } = component;
                for page in [None, Some(page.clone())] {
                    for id in [None, Some(id.clone())] {
                        entries
                            .entry(ComponentKey {
                                page: page.clone(),
                                kind: kind.clone(),
                                component_name: component_name.clone(),
                                id,
                            })
                            .or_insert_with(|| data.clone());
                    }
                }
            }
        }
        trace!(entries = entries.len(), "built tenant component index");
        Self { entries }
    }

    pub fn get(&self, key: &ComponentKey) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle for one in-flight tenant data fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch or a theme switch superseded this one.
    Stale,
    Failed,
}

/// Status of the latest tenant data fetch, for the rendering surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Tenant data as persisted on the backend.
#[derive(Debug, Clone)]
pub struct TenantStore {
    tenant_id: String,
    data: TenantData,
    index: TenantIndex,
    generation: u64,
    status: FetchStatus,
}

impl TenantStore {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self::with_data(tenant_id, TenantData::default())
    }

    pub fn with_data(tenant_id: impl Into<String>, data: TenantData) -> Self {
        let index = TenantIndex::build(&data.component_settings);
        Self {
            tenant_id: tenant_id.into(),
            data,
            index,
            generation: 0,
            status: FetchStatus::Idle,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn data(&self) -> &TenantData {
        &self.data
    }

    pub fn into_data(self) -> TenantData {
        self.data
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn index(&self) -> &TenantIndex {
        &self.index
    }

    pub fn branding_colors(&self) -> &BrandingColors {
        self.data.branding_colors()
    }

    pub fn website_layout(&self) -> &WebsiteLayout {
        &self.data.website_layout
    }

    pub fn website_layout_mut(&mut self) -> &mut WebsiteLayout {
        &mut self.data.website_layout
    }

    pub fn current_theme(&self) -> Option<u32> {
        self.data.website_layout.current_theme
    }

    pub fn set_current_theme(&mut self, theme: u32) {
        self.data.website_layout.current_theme = Some(theme);
    }

    /// Persisted data of the first component matching `key`.
    pub fn lookup(&self, key: &ComponentKey) -> Option<&serde_json::Value> {
        self.index.get(key)
    }

    /// Shape the tenant originally persisted `page` in, if it has the page.
    pub fn page_representation(&self, page: &str) -> Option<Representation> {
        self.data
            .component_settings
            .get(page)
            .map(PageComponents::representation)
    }

    /// Replaces the whole payload and rebuilds the index.
    pub fn replace(&mut self, data: TenantData) {
        self.index = TenantIndex::build(&data.component_settings);
        self.data = data;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Discards every fetch started before this call.
    pub fn invalidate_pending_fetches(&mut self) {
        self.generation += 1;
        if self.status == FetchStatus::Loading {
            self.status = FetchStatus::Loaded;
        }
    }

    /// Applies a fetch result unless a newer fetch or a theme switch
    /// superseded it. A failure keeps the last-known data.
    pub fn complete_fetch<E: std::fmt::Display>(
        &mut self,
        ticket: FetchTicket,
        result: Result<TenantData, E>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            info!(
                tenant = self.tenant_id,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale tenant fetch"
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(data) => {
                self.replace(data);
                self.status = FetchStatus::Loaded;
                FetchOutcome::Applied
            }
            Err(error) => {
                warn!(
                    tenant = self.tenant_id,
                    %error,
                    "tenant fetch failed, keeping last-known data"
                );
                self.status = FetchStatus::Failed(error.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Writes the session's pages and header/footer back into the persisted
    /// representation.
    ///
    /// Each page keeps the shape given in `representations`, falling back to
    /// the shape it was persisted in, then to a sequence.
    pub fn sync_from_session(
        &mut self,
        session: &EditorSession,
        representations: &IndexMap<String, Representation>,
    ) {
        let pages = session
            .snapshot_pages()
            .into_iter()
            .map(|(page, components)| {
                let representation = representations
                    .get(&page)
                    .copied()
                    .or_else(|| self.page_representation(&page))
                    .unwrap_or_default();
                let components = PageComponents::from_components(representation, components);
                (page, components)
            })
            .collect::<IndexMap<_, _>>();
        let mut global = session.global_components_data();
        global.extra = std::mem::take(&mut self.data.global_components_data.extra);
        self.data.component_settings = ComponentSettings(pages);
        self.data.global_components_data = global;
        self.index = TenantIndex::build(&self.data.component_settings);
        info!(
            tenant = self.tenant_id,
            pages = self.data.component_settings.0.len(),
            "synced session into tenant data"
        );
    }
}
