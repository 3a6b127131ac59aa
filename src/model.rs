//! Tenant presentation data model
//!
//! Component instances, page component sets and the tenant payload shapes
//! exchanged with the backend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::GlobalColorType;

/// Grid column span given to a component whose layout was never set.
pub const DEFAULT_SPAN: usize = 12;

fn default_span() -> usize {
    DEFAULT_SPAN
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// Grid placement of a component on its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlacement {
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    #[serde(default = "default_span")]
    pub span: usize,
}

impl GridPlacement {
    pub fn at_row(row: usize) -> Self {
        Self {
            row,
            col: 0,
            span: DEFAULT_SPAN,
        }
    }
}

/// One placed component on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub component_name: String,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<GridPlacement>,
    /// Fields this engine does not interpret, kept so persisted entries round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ComponentInstance {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        component_name: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            component_name: component_name.into(),
            data,
            position: None,
            layout: None,
            extra: Default::default(),
        }
    }

    /// The variant used to pick default data. Falls back to the type name.
    pub fn variant(&self) -> &str {
        if self.component_name.is_empty() {
            &self.kind
        } else {
            &self.component_name
        }
    }
}

/// Rewrites `position` and `layout.row` so both equal the array index.
///
/// Returns whether anything had drifted.
pub fn normalize_positions(components: &mut [ComponentInstance]) -> bool {
    let mut drifted = false;
    for (index, component) in components.iter_mut().enumerate() {
        if component.position != Some(index) {
            component.position = Some(index);
            drifted = true;
        }
        match &mut component.layout {
            Some(layout) if layout.row == index => {}
            Some(layout) => {
                layout.row = index;
                drifted = true;
            }
            None => {
                component.layout = Some(GridPlacement::at_row(index));
                drifted = true;
            }
        }
    }
    drifted
}

/// Fills absent positions from the array index, orders by position and
/// normalizes. Used whenever a page is instantiated from stored data.
pub fn arrange(mut components: Vec<ComponentInstance>) -> Vec<ComponentInstance> {
    for (index, component) in components.iter_mut().enumerate() {
        if component.position.is_none() {
            component.position = Some(index);
        }
    }
    components.sort_by_key(|component| component.position);
    normalize_positions(&mut components);
    components
}

/// How a page's component list is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    #[default]
    Sequence,
    Keyed,
}

/// Ordered collection of components for one page, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageComponents {
    Sequence(Vec<ComponentInstance>),
    Keyed(IndexMap<String, ComponentInstance>),
}

impl Default for PageComponents {
    fn default() -> Self {
        Self::Sequence(Vec::new())
    }
}

impl PageComponents {
    /// Leniently interprets a persisted page value.
    ///
    /// A value that is neither an array nor an object yields an empty page;
    /// entries that are not valid components are skipped.
    pub fn from_value(page: &str, value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(entries) => Self::Sequence(
                entries
                    .into_iter()
                    .filter_map(|entry| parse_component(page, None, entry))
                    .collect(),
            ),
            serde_json::Value::Object(entries) => Self::Keyed(
                entries
                    .into_iter()
                    .filter_map(|(key, entry)| {
                        parse_component(page, Some(&key), entry).map(|component| (key, component))
                    })
                    .collect(),
            ),
            other => {
                warn!(
                    page,
                    got = %other,
                    "persisted page is neither array nor map, treating as empty"
                );
                Self::default()
            }
        }
    }

    pub fn from_components(
        representation: Representation,
        components: impl IntoIterator<Item = ComponentInstance>,
    ) -> Self {
        match representation {
            Representation::Sequence => Self::Sequence(components.into_iter().collect()),
            Representation::Keyed => Self::Keyed(
                components
                    .into_iter()
                    .map(|component| (component.id.clone(), component))
                    .collect(),
            ),
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            Self::Sequence(_) => Representation::Sequence,
            Self::Keyed(_) => Representation::Keyed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(components) => components.len(),
            Self::Keyed(components) => components.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components in render order.
    pub fn into_components(self) -> Vec<ComponentInstance> {
        match self {
            Self::Sequence(components) => arrange(components),
            Self::Keyed(components) => arrange(components.into_values().collect()),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &ComponentInstance> + '_> {
        match self {
            Self::Sequence(components) => Box::new(components.iter()),
            Self::Keyed(components) => Box::new(components.values()),
        }
    }
}

fn parse_component(
    page: &str,
    key: Option<&str>,
    entry: serde_json::Value,
) -> Option<ComponentInstance> {
    match serde_json::from_value::<ComponentInstance>(entry) {
        Ok(mut component) => {
            if component.id.is_empty() {
                if let Some(key) = key {
                    component.id = key.to_owned();
                }
            }
            Some(component)
        }
        Err(error) => {
            warn!(page, key, %error, "skipping malformed component entry");
            None
        }
    }
}

/// Persisted page map. Malformed pages are healed on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, serde_json::Value>")]
pub struct ComponentSettings(pub IndexMap<String, PageComponents>);

impl From<IndexMap<String, serde_json::Value>> for ComponentSettings {
    fn from(pages: IndexMap<String, serde_json::Value>) -> Self {
        Self(
            pages
                .into_iter()
                .map(|(page, value)| {
                    let components = PageComponents::from_value(&page, value);
                    (page, components)
                })
                .collect(),
        )
    }
}

impl ComponentSettings {
    pub fn get(&self, page: &str) -> Option<&PageComponents> {
        self.0.get(page)
    }

    pub fn pages(&self) -> impl Iterator<Item = (&String, &PageComponents)> {
        self.0.iter()
    }
}

/// Site-wide header and footer configuration.
///
/// Each of `header` and `footer` carries its own `variant` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalComponentsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GlobalComponentsData {
    pub fn header_variant(&self) -> Option<&str> {
        self.header.as_ref().and_then(embedded_variant)
    }

    pub fn footer_variant(&self) -> Option<&str> {
        self.footer.as_ref().and_then(embedded_variant)
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none() && self.extra.is_empty()
    }
}

/// Reads the `variant` key embedded in a header or footer object.
pub fn embedded_variant(value: &serde_json::Value) -> Option<&str> {
    value
        .get("variant")
        .and_then(serde_json::Value::as_str)
        .filter(|variant| !variant.is_empty())
}

/// Tenant branding colors. Blank values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingColors {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
}

impl BrandingColors {
    pub fn slot(&self, kind: GlobalColorType) -> Option<&str> {
        let value = match kind {
            GlobalColorType::Primary => &self.primary,
            GlobalColorType::Secondary => &self.secondary,
            GlobalColorType::Accent => &self.accent,
        };
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn is_unset(&self) -> bool {
        [
            GlobalColorType::Primary,
            GlobalColorType::Secondary,
            GlobalColorType::Accent,
        ]
        .into_iter()
        .all(|kind| self.slot(kind).is_none())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub colors: BrandingColors,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Layout settings of the tenant website.
///
/// Theme backups are stored here under their `Theme<N>Backup` keys so they
/// survive a reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_theme: Option<u32>,
    #[serde(default)]
    pub branding: Branding,
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

/// Payload of the tenant data fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantData {
    #[serde(default)]
    pub component_settings: ComponentSettings,
    #[serde(default)]
    pub global_components_data: GlobalComponentsData,
    #[serde(default, rename = "WebsiteLayout")]
    pub website_layout: WebsiteLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

impl TenantData {
    /// Branding colors from the layout settings, falling back to the
    /// top-level branding block when the layout carries none.
    pub fn branding_colors(&self) -> &BrandingColors {
        let layout = &self.website_layout.branding.colors;
        match &self.branding {
            Some(branding) if layout.is_unset() => &branding.colors,
            _ => layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn component(id: &str, position: Option<usize>) -> ComponentInstance {
        ComponentInstance {
            position,
            ..ComponentInstance::new(id, "card", "card1", json!({}))
        }
    }

    #[test]
    fn normalize_rewrites_position_and_row() {
        let mut components = vec![
            component("a", Some(3)),
            component("b", None),
            component("c", Some(1)),
        ];
        assert!(normalize_positions(&mut components));
        for (index, component) in components.iter().enumerate() {
            assert_eq!(component.position, Some(index));
            assert_eq!(component.layout.as_ref().unwrap().row, index);
        }
        assert!(!normalize_positions(&mut components));
    }

    #[test]
    fn keyed_page_is_ordered_by_position() {
        let page = PageComponents::from_value(
            "home",
            json!({
                "second": {"type": "card", "componentName": "card1", "position": 1},
                "first": {"type": "card", "componentName": "card1", "position": 0},
            }),
        );
        assert_eq!(page.representation(), Representation::Keyed);
        let ids = page
            .into_components()
            .into_iter()
            .map(|component| component.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn malformed_page_becomes_empty_sequence() {
        let page = PageComponents::from_value("home", json!("not a page"));
        assert_eq!(page, PageComponents::Sequence(Vec::new()));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let page = PageComponents::from_value(
            "home",
            json!([{"id": "ok", "type": "card"}, 42, {"id": "no-type"}]),
        );
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn blank_branding_slot_is_unset() {
        let colors = BrandingColors {
            primary: Some("#111111".into()),
            secondary: None,
            accent: Some("   ".into()),
        };
        assert_eq!(colors.slot(GlobalColorType::Accent), None);
        assert_eq!(colors.slot(GlobalColorType::Primary), Some("#111111"));
    }
}
