//! Default data provider
//!
//! Every component type/variant pair has a baseline configuration. Partial
//! overrides are merged on top of it, so the baseline must hold every leaf
//! a renderer may read.

use indexmap::IndexMap;
use serde_json::json;
use tracing::trace;

use crate::merge::deep_merge;

mod sections;
mod site;

pub type DefaultFn = fn() -> serde_json::Value;

/// Baseline shared by every component, also returned for unknown pairs.
pub fn generic_baseline() -> serde_json::Value {
    json!({
        "visible": true,
        "content": {},
        "styling": {
            "colors": {
                "background": { "useDefaultColor": true, "globalColorType": "primary" },
                "text": { "useDefaultColor": true, "globalColorType": "secondary" },
            },
            "padding": { "top": "48px", "bottom": "48px" },
        },
        "typography": {
            "title": { "fontSize": "32px", "fontWeight": "700", "fontFamily": "inherit" },
            "body": { "fontSize": "16px", "fontWeight": "400", "fontFamily": "inherit" },
        },
        "layout": { "maxWidth": "1200px", "columns": 1, "gap": "24px" },
        "responsive": {
            "mobile": { "columns": 1 },
            "tablet": { "columns": 1 },
        },
        "settings": {},
    })
}

/// Baseline with `specific` merged over it.
pub(crate) fn extend(specific: serde_json::Value) -> serde_json::Value {
    let mut base = generic_baseline();
    deep_merge(&mut base, &specific);
    base
}

/// Registry of default data functions keyed by (type, variant).
#[derive(Clone)]
pub struct DefaultDataRegistry {
    entries: IndexMap<(String, String), DefaultFn>,
}

impl std::fmt::Debug for DefaultDataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl Default for DefaultDataRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultDataRegistry {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Registry holding every shipped component variant.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        site::register(&mut registry);
        sections::register(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        variant: impl Into<String>,
        default: DefaultFn,
    ) -> &mut Self {
        self.entries.insert((kind.into(), variant.into()), default);
        self
    }

    pub fn contains(&self, kind: &str, variant: &str) -> bool {
        self.entries
            .contains_key(&(kind.to_owned(), variant.to_owned()))
    }

    /// Default data for (type, variant). Never fails: unknown pairs get the
    /// generic baseline.
    pub fn default_data(&self, kind: &str, variant: &str) -> serde_json::Value {
        match self.entries.get(&(kind.to_owned(), variant.to_owned())) {
            Some(default) => default(),
            None => {
                trace!(kind, variant, "no registered defaults, using baseline");
                generic_baseline()
            }
        }
    }

    /// Variants registered for a type, in registration order.
    pub fn variants<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .keys()
            .filter(move |(registered, _)| registered == kind)
            .map(|(_, variant)| variant.as_str())
    }
}
