use crate::{editor::Editor, model::TenantData, tenant::TenantStore, theme::ThemeCatalog};

mod merge;
mod session;

const TENANT: &str = "acme";

async fn tenant_fixture() -> TenantData {
    let document = tokio::fs::read_to_string("src/tests/fixtures/tenant.json")
        .await
        .unwrap();
    serde_json::from_str(&document).unwrap()
}

async fn catalog_fixture() -> ThemeCatalog {
    ThemeCatalog::load("src/tests/fixtures/themes/*.yaml")
        .await
        .unwrap()
}

/// Editor on the tenant fixture, hydrated as an opened editing session.
async fn editor_fixture() -> Editor {
    let tenant = TenantStore::with_data(TENANT, tenant_fixture().await);
    let mut editor = Editor::new(tenant, catalog_fixture().await);
    editor.hydrate();
    editor
}

#[tokio::test]
async fn catalog_loads_every_fixture_theme() {
    let catalog = catalog_fixture().await;
    assert_eq!(catalog.themes().collect::<Vec<_>>(), vec![1, 2]);
    let theme2 = catalog.get(2).unwrap();
    assert_eq!(
        theme2
            .component_settings
            .get("home")
            .map(crate::model::PageComponents::representation),
        Some(crate::model::Representation::Keyed)
    );
    assert_eq!(
        theme2.global_components_data.header_variant(),
        Some("header2")
    );
}

#[tokio::test]
async fn template_without_theme_number_is_rejected() {
    let error = ThemeCatalog::load_file("src/tests/fixtures/tenant.json")
        .await
        .unwrap_err();
    assert!(matches!(
        *error.detail,
        crate::ErrorDetail::MissingThemeNumber
    ));
}
