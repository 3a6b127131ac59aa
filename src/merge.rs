//! Override merging
//!
//! Resolves the effective configuration of one component instance from up to
//! five layers, lowest priority first: defaults, persisted tenant data, live
//! session data, the session's transient slice and caller overrides.

use serde::Serialize;
use tracing::trace;

use crate::{
    color::{self, GlobalColorType},
    defaults::DefaultDataRegistry,
    model::BrandingColors,
    session::{EditorSession, GlobalSlot},
    tenant::{ComponentKey, TenantStore},
};

/// Top-level fields merged key by key instead of being replaced.
pub const STRUCTURAL_FIELDS: [&str; 6] = [
    "content",
    "styling",
    "typography",
    "layout",
    "responsive",
    "settings",
];

/// Recursively merges `overlay` into `base`.
///
/// Objects merge key by key; anything else in `overlay`, arrays and `null`
/// included, replaces the value in `base`.
pub fn deep_merge(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Applies one layer on top of `target`: structural fields deep-merge, every
/// other top-level field is last-write-wins.
pub fn merge_layer(target: &mut serde_json::Value, layer: &serde_json::Value) {
    let Some(layer) = layer.as_object() else {
        trace!(?layer, "ignoring non-object layer");
        return;
    };
    if !target.is_object() {
        *target = serde_json::Value::Object(Default::default());
    }
    let Some(target) = target.as_object_mut() else {
        return;
    };
    for (key, value) in layer {
        if STRUCTURAL_FIELDS.contains(&key.as_str()) {
            if let Some(existing) = target.get_mut(key) {
                deep_merge(existing, value);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Folds layers, lowest priority first, into one object.
pub fn merge_layers<'a>(
    layers: impl IntoIterator<Item = &'a serde_json::Value>,
) -> serde_json::Value {
    layers.into_iter().fold(
        serde_json::Value::Object(Default::default()),
        |mut merged, layer| {
            merge_layer(&mut merged, layer);
            merged
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSource {
    Defaults,
    Persisted,
    Session,
    Current,
    Overrides,
}

/// One component instance to resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveRequest {
    pub kind: String,
    pub variant: String,
    pub page: Option<String>,
    pub id: Option<String>,
    pub overrides: Option<serde_json::Value>,
}

impl ResolveRequest {
    pub fn new(kind: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            variant: variant.into(),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn overrides(mut self, overrides: serde_json::Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    fn global_slot(&self) -> Option<GlobalSlot> {
        match self.kind.as_str() {
            "header" => Some(GlobalSlot::Header),
            "footer" => Some(GlobalSlot::Footer),
            _ => None,
        }
    }
}

/// Effective configuration of one component for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedConfig {
    value: serde_json::Value,
    sources: Vec<LayerSource>,
}

impl MergedConfig {
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn into_value(self) -> serde_json::Value {
        self.value
    }

    /// Layers that contributed, lowest priority first.
    pub fn sources(&self) -> &[LayerSource] {
        &self.sources
    }

    /// Value at a dotted path such as `typography.title.fontSize`.
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        color::lookup(&self.value, path)
    }

    pub fn visible(&self) -> bool {
        self.value
            .get("visible")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true)
    }

    /// Resolved color of the styling field at `path` (relative to `styling`).
    pub fn color(
        &self,
        path: &str,
        default_type: GlobalColorType,
        branding: &BrandingColors,
    ) -> String {
        match self.value.get("styling") {
            Some(styling) => color::resolve_color(path, styling, branding, default_type),
            None => color::resolve_color(path, &serde_json::Value::Null, branding, default_type),
        }
    }
}

/// Resolves component configuration against the defaults, the tenant store
/// and the editor session.
#[derive(Debug, Clone, Copy)]
pub struct MergeResolver<'a> {
    defaults: &'a DefaultDataRegistry,
    tenant: &'a TenantStore,
    session: &'a EditorSession,
}

impl<'a> MergeResolver<'a> {
    pub fn new(
        defaults: &'a DefaultDataRegistry,
        tenant: &'a TenantStore,
        session: &'a EditorSession,
    ) -> Self {
        Self {
            defaults,
            tenant,
            session,
        }
    }

    fn persisted_layer(
        &self,
        request: &ResolveRequest,
        variant: &str,
    ) -> Option<&'a serde_json::Value> {
        if let Some(slot) = request.global_slot() {
            let global = &self.tenant.data().global_components_data;
            return match slot {
                GlobalSlot::Header => global.header.as_ref(),
                GlobalSlot::Footer => global.footer.as_ref(),
            };
        }
        let mut key = ComponentKey::new(&request.kind, variant);
        if let Some(id) = &request.id {
            key = key.with_id(id);
        }
        let scoped = request
            .page
            .as_ref()
            .and_then(|page| self.tenant.lookup(&key.clone().on_page(page)));
        scoped.or_else(|| self.tenant.lookup(&key))
    }

    fn session_layer(&self, request: &ResolveRequest) -> Option<&'a serde_json::Value> {
        let by_id = request
            .id
            .as_ref()
            .and_then(|id| self.session.component_data_opt(&request.kind, id));
        match request.global_slot() {
            Some(slot) if by_id.is_none() => self.session.global_data(slot),
            _ => by_id,
        }
    }

    pub fn resolve(&self, request: &ResolveRequest) -> MergedConfig {
        let variant = match request.global_slot() {
            Some(slot) if request.variant.is_empty() => self
                .session
                .global_variant(slot)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{}1", slot.kind())),
            _ => request.variant.clone(),
        };
        let defaults = self.defaults.default_data(&request.kind, &variant);
        let layers = [
            (LayerSource::Defaults, Some(&defaults)),
            (LayerSource::Persisted, self.persisted_layer(request, &variant)),
            (LayerSource::Session, self.session_layer(request)),
            (
                LayerSource::Current,
                self.session.current_data(&request.kind),
            ),
            (LayerSource::Overrides, request.overrides.as_ref()),
        ];
        let sources = layers
            .iter()
            .filter_map(|(source, layer)| layer.map(|_| *source))
            .collect::<Vec<_>>();
        let value = merge_layers(layers.iter().filter_map(|(_, layer)| *layer));
        trace!(
            kind = request.kind,
            variant,
            id = request.id,
            ?sources,
            "resolved component"
        );
        MergedConfig { value, sources }
    }
}
