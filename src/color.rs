//! Color resolution for styled fields
//!
//! A colorable field either follows a tenant branding slot or carries a
//! custom hex value. Every visual component resolves colors through
//! [`resolve_color`] so the fallback chain behaves the same everywhere.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::BrandingColors;

/// Color used when neither the field nor the tenant branding supplies one.
pub const BASELINE_COLOR: &str = "#059669";

static HEX_COLOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Branding slot a field follows while `useDefaultColor` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalColorType {
    #[default]
    Primary,
    Secondary,
    Accent,
}

impl std::str::FromStr for GlobalColorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "accent" => Ok(Self::Accent),
            other => Err(format!("unknown color type: {other}")),
        }
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Branding slot, then branding primary, then [`BASELINE_COLOR`].
pub fn branding_color(branding: &BrandingColors, kind: GlobalColorType) -> String {
    branding
        .slot(kind)
        .or_else(|| branding.slot(GlobalColorType::Primary))
        .unwrap_or(BASELINE_COLOR)
        .to_owned()
}

/// Settings of one colorable field as found in a styling object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorField<'a> {
    pub use_default_color: bool,
    pub global_color_type: GlobalColorType,
    pub value: Option<&'a str>,
}

impl<'a> ColorField<'a> {
    /// Reads the field at `node`. A plain string is a custom value; an absent
    /// or non-object node follows the branding slot `default_type`.
    pub fn read(node: Option<&'a serde_json::Value>, default_type: GlobalColorType) -> Self {
        match node {
            Some(serde_json::Value::String(value)) => Self {
                use_default_color: false,
                global_color_type: default_type,
                value: Some(value),
            },
            Some(serde_json::Value::Object(field)) => Self {
                use_default_color: field
                    .get("useDefaultColor")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(true),
                global_color_type: field
                    .get("globalColorType")
                    .and_then(serde_json::Value::as_str)
                    .and_then(|kind| kind.parse().ok())
                    .unwrap_or(default_type),
                value: field
                    .get("value")
                    .or_else(|| field.get("color"))
                    .and_then(serde_json::Value::as_str),
            },
            _ => Self {
                use_default_color: true,
                global_color_type: default_type,
                value: None,
            },
        }
    }
}

/// Walks a dotted path (`colors.background`) through nested objects.
pub fn lookup<'v>(root: &'v serde_json::Value, path: &str) -> Option<&'v serde_json::Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Resolves the color of the field at `field_path` inside `styling`.
pub fn resolve_color(
    field_path: &str,
    styling: &serde_json::Value,
    branding: &BrandingColors,
    default_type: GlobalColorType,
) -> String {
    let field = ColorField::read(lookup(styling, field_path), default_type);
    if !field.use_default_color {
        match field.value.map(str::trim) {
            Some(value) if is_hex_color(value) => return value.to_owned(),
            Some(value) => {
                debug!(field_path, value, "ignoring malformed custom color");
            }
            None => {}
        }
    }
    branding_color(branding, field.global_color_type)
}
