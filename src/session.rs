//! Editor session store
//!
//! In-memory component state of one editing session. Every mutation bumps a
//! monotonic version and notifies subscribers synchronously, so renderers can
//! key off the version instead of comparing references.

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info, warn};

use crate::model::{self, ComponentInstance, GlobalComponentsData};

static EMPTY: LazyLock<serde_json::Value> =
    LazyLock::new(|| serde_json::Value::Object(Default::default()));

/// Which site-wide slot an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalSlot {
    Header,
    Footer,
}

impl GlobalSlot {
    pub fn kind(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ComponentSeeded { kind: String, id: String },
    ComponentChanged { kind: String, id: String },
    CurrentChanged { kind: String },
    PageChanged { page: String, forced: bool },
    VariantChanged { slot: GlobalSlot, variant: String },
    GlobalChanged { slot: GlobalSlot },
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub version: u64,
    pub event: SessionEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Notification) + Send>;

#[derive(Debug, Clone, Default, PartialEq)]
struct GlobalState {
    variant: Option<String>,
    data: Option<serde_json::Value>,
}

/// Live component state of an editing session.
#[derive(Default)]
pub struct EditorSession {
    buckets: IndexMap<String, IndexMap<String, serde_json::Value>>,
    edited: IndexSet<(String, String)>,
    current: IndexMap<String, serde_json::Value>,
    pages: IndexMap<String, Vec<ComponentInstance>>,
    page_versions: IndexMap<String, u64>,
    header: GlobalState,
    footer: GlobalState,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("buckets", &self.buckets)
            .field("edited", &self.edited)
            .field("current", &self.current)
            .field("pages", &self.pages)
            .field("header", &self.header)
            .field("footer", &self.footer)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version of the latest mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version of the latest mutation that touched `page`, zero if never.
    pub fn page_version(&self, page: &str) -> u64 {
        self.page_versions.get(page).copied().unwrap_or_default()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Notification) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: SessionEvent) -> u64 {
        self.version += 1;
        let notification = Notification {
            version: self.version,
            event,
        };
        for (_, listener) in &mut self.listeners {
            listener(&notification);
        }
        self.version
    }

    /// Seeds state for (type, id) unless some already exists.
    ///
    /// Returns whether it seeded. Existing edits are never replaced.
    pub fn ensure_component_variant(
        &mut self,
        kind: &str,
        id: &str,
        initial: serde_json::Value,
    ) -> bool {
        let bucket = self.buckets.entry(kind.to_owned()).or_default();
        if bucket.contains_key(id) {
            return false;
        }
        bucket.insert(id.to_owned(), initial);
        debug!(kind, id, "seeded component state");
        self.emit(SessionEvent::ComponentSeeded {
            kind: kind.to_owned(),
            id: id.to_owned(),
        });
        true
    }

    /// Live data for (type, id), or an empty object when absent.
    pub fn component_data(&self, kind: &str, id: &str) -> &serde_json::Value {
        self.component_data_opt(kind, id).unwrap_or(&EMPTY)
    }

    pub fn component_data_opt(&self, kind: &str, id: &str) -> Option<&serde_json::Value> {
        self.buckets.get(kind).and_then(|bucket| bucket.get(id))
    }

    /// Replaces the live data for (type, id) as an edit. Edited data takes
    /// precedence over the data of every page entry with that (type, id).
    pub fn set_component_data(&mut self, kind: &str, id: &str, data: serde_json::Value) -> u64 {
        self.edited.insert((kind.to_owned(), id.to_owned()));
        self.write_component_data(kind, id, data)
    }

    /// Replaces the live data for (type, id) with stored data, leaving page
    /// entries authoritative over it.
    pub fn load_component_data(&mut self, kind: &str, id: &str, data: serde_json::Value) -> u64 {
        self.edited.shift_remove(&(kind.to_owned(), id.to_owned()));
        self.write_component_data(kind, id, data)
    }

    /// Whether (type, id) was edited since it was last loaded.
    pub fn is_edited(&self, kind: &str, id: &str) -> bool {
        self.edited.contains(&(kind.to_owned(), id.to_owned()))
    }

    fn write_component_data(&mut self, kind: &str, id: &str, data: serde_json::Value) -> u64 {
        self.buckets
            .entry(kind.to_owned())
            .or_default()
            .insert(id.to_owned(), data);
        self.emit(SessionEvent::ComponentChanged {
            kind: kind.to_owned(),
            id: id.to_owned(),
        })
    }

    /// Ids with state in the bucket of `kind`.
    pub fn component_ids<'a>(&'a self, kind: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.buckets
            .get(kind)
            .into_iter()
            .flat_map(|bucket| bucket.keys().map(String::as_str))
    }

    /// The transient slice some component families keep next to the
    /// per-id bucket.
    pub fn current_data(&self, kind: &str) -> Option<&serde_json::Value> {
        self.current.get(kind)
    }

    pub fn set_current_data(&mut self, kind: &str, data: serde_json::Value) -> u64 {
        self.current.insert(kind.to_owned(), data);
        self.emit(SessionEvent::CurrentChanged {
            kind: kind.to_owned(),
        })
    }

    pub fn clear_current_data(&mut self, kind: &str) -> Option<serde_json::Value> {
        let previous = self.current.shift_remove(kind)?;
        self.emit(SessionEvent::CurrentChanged {
            kind: kind.to_owned(),
        });
        Some(previous)
    }

    pub fn page_components(&self, page: &str) -> &[ComponentInstance] {
        self.pages.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pages(&self) -> impl Iterator<Item = (&str, &[ComponentInstance])> {
        self.pages
            .iter()
            .map(|(page, components)| (page.as_str(), components.as_slice()))
    }

    /// Page lists as the editor currently shows them. Components edited
    /// through [`Self::set_component_data`] carry their live state; every
    /// other entry keeps the data its page was installed with.
    pub fn snapshot_pages(&self) -> IndexMap<String, Vec<ComponentInstance>> {
        self.pages
            .iter()
            .map(|(page, components)| {
                let components = components
                    .iter()
                    .map(|component| {
                        let mut component = component.clone();
                        let edited = self
                            .is_edited(&component.kind, &component.id)
                            .then(|| self.component_data_opt(&component.kind, &component.id))
                            .flatten();
                        if let Some(data) = edited {
                            component.data = data.clone();
                        }
                        component
                    })
                    .collect();
                (page.clone(), components)
            })
            .collect()
    }

    pub fn has_page(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Installs the component list of `page`.
    ///
    /// Positions are normalized first. Subscribers are not notified when the
    /// normalized list equals the installed one; returns whether it changed.
    pub fn set_page_components_for_page(
        &mut self,
        page: &str,
        mut components: Vec<ComponentInstance>,
    ) -> bool {
        if model::normalize_positions(&mut components) {
            debug!(page, "corrected position drift");
        }
        if self.pages.get(page) == Some(&components) {
            return false;
        }
        self.install_page(page, components, false);
        true
    }

    /// Installs the component list of `page` and always notifies.
    pub fn force_update_page_components(
        &mut self,
        page: &str,
        mut components: Vec<ComponentInstance>,
    ) -> u64 {
        model::normalize_positions(&mut components);
        self.install_page(page, components, true)
    }

    /// Re-announces the installed list of `page` with a fresh version.
    pub fn refresh_page(&mut self, page: &str) -> Option<u64> {
        let components = self.pages.get(page)?.clone();
        Some(self.force_update_page_components(page, components))
    }

    fn install_page(
        &mut self,
        page: &str,
        components: Vec<ComponentInstance>,
        forced: bool,
    ) -> u64 {
        self.pages.insert(page.to_owned(), components);
        let version = self.emit(SessionEvent::PageChanged {
            page: page.to_owned(),
            forced,
        });
        self.page_versions.insert(page.to_owned(), version);
        version
    }

    pub fn remove_page(&mut self, page: &str) -> Option<Vec<ComponentInstance>> {
        let removed = self.pages.shift_remove(page)?;
        let version = self.emit(SessionEvent::PageChanged {
            page: page.to_owned(),
            forced: false,
        });
        self.page_versions.insert(page.to_owned(), version);
        Some(removed)
    }

    fn global_mut(&mut self, slot: GlobalSlot) -> &mut GlobalState {
        match slot {
            GlobalSlot::Header => &mut self.header,
            GlobalSlot::Footer => &mut self.footer,
        }
    }

    fn global(&self, slot: GlobalSlot) -> &GlobalState {
        match slot {
            GlobalSlot::Header => &self.header,
            GlobalSlot::Footer => &self.footer,
        }
    }

    pub fn set_global_variant(&mut self, slot: GlobalSlot, variant: impl Into<String>) -> u64 {
        let variant = variant.into();
        self.global_mut(slot).variant = Some(variant.clone());
        self.emit(SessionEvent::VariantChanged { slot, variant })
    }

    pub fn set_global_data(&mut self, slot: GlobalSlot, data: serde_json::Value) -> u64 {
        self.global_mut(slot).data = Some(data);
        self.emit(SessionEvent::GlobalChanged { slot })
    }

    pub fn global_variant(&self, slot: GlobalSlot) -> Option<&str> {
        self.global(slot).variant.as_deref()
    }

    pub fn global_data(&self, slot: GlobalSlot) -> Option<&serde_json::Value> {
        self.global(slot).data.as_ref()
    }

    /// Header and footer state with each variant embedded in its object.
    pub fn global_components_data(&self) -> GlobalComponentsData {
        let embed = |state: &GlobalState| -> Option<serde_json::Value> {
            let mut data = match (&state.data, &state.variant) {
                (None, None) => return None,
                (Some(data), _) => data.clone(),
                (None, Some(_)) => serde_json::Value::Object(Default::default()),
            };
            if let Some(variant) = &state.variant {
                if let Some(object) = data.as_object_mut() {
                    object.insert("variant".into(), variant.clone().into());
                } else {
                    warn!(
                        ?data,
                        "global component data is not an object, variant not embedded"
                    );
                }
            }
            Some(data)
        };
        GlobalComponentsData {
            header: embed(&self.header),
            footer: embed(&self.footer),
            extra: Default::default(),
        }
    }

    /// Drops every bucket, page and the header/footer state.
    pub fn clear_all_states(&mut self) -> u64 {
        let pages = self.pages.len();
        self.buckets.clear();
        self.edited.clear();
        self.current.clear();
        let cleared = std::mem::take(&mut self.pages);
        self.header = GlobalState::default();
        self.footer = GlobalState::default();
        let version = self.emit(SessionEvent::Cleared);
        for page in cleared.into_keys() {
            self.page_versions.insert(page, version);
        }
        info!(pages, version, "cleared editor session");
        version
    }
}
