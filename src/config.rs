use serde::Deserialize;

fn default_database() -> String {
    "sqlite://presentation.db".to_owned()
}

fn default_themes() -> String {
    "themes/*.yaml".to_owned()
}

#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tenant whose presentation data is edited.
    pub tenant: String,
    /// SQLite URL of the tenant store.
    #[serde(default = "default_database")]
    pub database: String,
    /// Glob matching the bundled theme templates.
    #[serde(default = "default_themes")]
    pub themes: String,
    /// Page the rendering surface shows; force-refreshed after a restore.
    #[serde(default)]
    pub active_page: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.tenant.trim().is_empty() {
            return Err("tenant must not be empty".to_owned());
        }
        if self.themes.trim().is_empty() {
            return Err("themes glob must not be empty".to_owned());
        }
        if self
            .active_page
            .as_deref()
            .is_some_and(|page| page.trim().is_empty())
        {
            return Err("active_page must not be blank".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config: Config = serde_yaml::from_str("tenant: acme\n").unwrap();
        assert_eq!(config.database, "sqlite://presentation.db");
        assert_eq!(config.themes, "themes/*.yaml");
        assert!(config.active_page.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_tenant_is_rejected() {
        let config: Config = serde_yaml::from_str("tenant: ' '\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<Config>("tenant: acme\ntheme: 2\n").is_err());
    }
}
