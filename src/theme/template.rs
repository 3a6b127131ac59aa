//! Bundled theme templates
//!
//! A template is the shipped page/component dataset of one theme number.
//! Template files are YAML, JSON or TOML; the theme number is taken from the
//! file name (`theme2.yaml`).

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, ErrorContext, ErrorDetail,
    model::{ComponentSettings, GlobalComponentsData},
};

static THEME_NUMBER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(\d+)").unwrap());

/// Static dataset of one theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTemplate {
    #[serde(default, alias = "pages")]
    pub component_settings: ComponentSettings,
    #[serde(default)]
    pub global_components_data: GlobalComponentsData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateSyntax {
    Yaml,
    Json,
    Toml,
}

impl TemplateSyntax {
    fn detect(path: &Path) -> Result<Self, ErrorDetail> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ErrorDetail::UnsupportedFormat(
                other.unwrap_or_default().to_owned(),
            )),
        }
    }

    fn parse(self, document: &str) -> Result<ThemeTemplate, ErrorDetail> {
        match self {
            Self::Yaml => serde_yaml::from_str(document).map_err(ErrorDetail::ParseYaml),
            Self::Json => serde_json::from_str(document).map_err(ErrorDetail::ParseJson),
            Self::Toml => toml::de::from_str(document).map_err(ErrorDetail::ParseToml),
        }
    }
}

fn theme_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    THEME_NUMBER
        .captures(stem)
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse().ok())
}

/// Templates of every bundled theme, keyed by theme number.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    templates: BTreeMap<u32, ThemeTemplate>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, theme: u32, template: ThemeTemplate) -> Option<ThemeTemplate> {
        self.templates.insert(theme, template)
    }

    pub fn with(mut self, theme: u32, template: ThemeTemplate) -> Self {
        self.insert(theme, template);
        self
    }

    pub fn get(&self, theme: u32) -> Option<&ThemeTemplate> {
        self.templates.get(&theme)
    }

    pub fn contains(&self, theme: u32) -> bool {
        self.templates.contains_key(&theme)
    }

    pub fn themes(&self) -> impl Iterator<Item = u32> + '_ {
        self.templates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Reads one template file.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<(u32, ThemeTemplate), Error> {
        let path = path.as_ref();
        let ctx = ErrorContext::new(path.to_owned());
        let theme = theme_number(path).ok_or_else(|| ctx.error(ErrorDetail::MissingThemeNumber))?;
        let ctx = ctx.with_theme(theme);
        let syntax = TemplateSyntax::detect(path).map_err(|detail| ctx.error(detail))?;
        let document = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| ctx.error(ErrorDetail::ReadTemplate(error)))?;
        let template = syntax.parse(&document).map_err(|detail| ctx.error(detail))?;
        debug!(
            theme,
            path = %path.display(),
            pages = template.component_settings.0.len(),
            "loaded theme template"
        );
        Ok((theme, template))
    }

    /// Reads every template file matching a glob pattern.
    pub async fn load(pattern: &str) -> Result<Self, Error> {
        let ctx = ErrorContext::new(PathBuf::from(pattern));
        let paths = glob::glob(pattern)
            .map_err(|error| ctx.error(ErrorDetail::InvalidPattern(error)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| ctx.error(ErrorDetail::Glob(error)))?;
        let mut catalog = Self::new();
        for path in paths {
            let (theme, template) = Self::load_file(&path).await?;
            catalog.insert(theme, template);
        }
        info!(pattern, themes = catalog.len(), "loaded theme catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_number_from_file_name() {
        assert_eq!(theme_number(Path::new("themes/theme2.yaml")), Some(2));
        assert_eq!(theme_number(Path::new("themes/theme-14.json")), Some(14));
        assert_eq!(theme_number(Path::new("themes/3.toml")), Some(3));
        assert_eq!(theme_number(Path::new("themes/default.yaml")), None);
    }

    #[test]
    fn template_accepts_pages_alias() {
        let template: ThemeTemplate = serde_json::from_value(serde_json::json!({
            "pages": { "home": [{ "id": "hero", "type": "halfTextHalfImage" }] },
        }))
        .unwrap();
        assert_eq!(template.component_settings.0.len(), 1);
    }
}
