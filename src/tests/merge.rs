use serde_json::json;

use crate::{
    color::{BASELINE_COLOR, GlobalColorType, resolve_color},
    defaults::DefaultDataRegistry,
    editor::Editor,
    merge::{LayerSource, ResolveRequest, deep_merge, merge_layers},
    model::BrandingColors,
    session::GlobalSlot,
    tenant::TenantStore,
    theme::ThemeCatalog,
};

use super::{TENANT, editor_fixture, tenant_fixture};

fn branding(primary: &str, secondary: &str, accent: &str) -> BrandingColors {
    BrandingColors {
        primary: Some(primary.to_owned()),
        secondary: Some(secondary.to_owned()),
        accent: Some(accent.to_owned()),
    }
}

#[test]
fn deep_merge_keeps_sibling_fields() {
    let mut base = json!({"styling": {"color": "#111111", "size": "sm"}});
    deep_merge(&mut base, &json!({"styling": {"color": "#222222"}}));
    assert_eq!(base, json!({"styling": {"color": "#222222", "size": "sm"}}));
}

#[test]
fn override_wins_over_persisted() {
    let defaults = json!({"visible": true, "content": {"title": "default"}});
    let persisted = json!({"content": {"title": "persisted", "subtitle": "kept"}});
    let session = json!({"content": {}});
    let overrides = json!({"content": {"title": "override"}});
    let merged = merge_layers([&defaults, &persisted, &session, &overrides]);
    assert_eq!(
        merged,
        json!({"visible": true, "content": {"title": "override", "subtitle": "kept"}})
    );
}

#[test]
fn arrays_and_scalars_are_replaced() {
    let merged = merge_layers([
        &json!({"visible": true, "content": {"items": [1, 2, 3]}, "extra": {"a": 1}}),
        &json!({"visible": false, "content": {"items": [4]}, "extra": {"b": 2}}),
    ]);
    assert_eq!(
        merged,
        json!({"visible": false, "content": {"items": [4]}, "extra": {"b": 2}})
    );
}

#[test]
fn null_overrides_lower_layers() {
    let merged = merge_layers([
        &json!({"content": {"title": "set"}}),
        &json!({"content": {"title": null}}),
    ]);
    assert_eq!(merged, json!({"content": {"title": null}}));
}

#[test]
fn unknown_variant_degrades_to_baseline() {
    let defaults = DefaultDataRegistry::builtin();
    let data = defaults.default_data("widget", "doesNotExist");
    assert_eq!(data["visible"], json!(true));
    assert!(data["typography"]["title"]["fontSize"].is_string());
    assert!(!defaults.contains("widget", "doesNotExist"));
}

#[test]
fn registered_defaults_extend_the_baseline() {
    let defaults = DefaultDataRegistry::builtin();
    let card = defaults.default_data("card", "card1");
    assert_eq!(card["visible"], json!(true));
    assert_eq!(card["content"]["limit"], json!(6));
    assert_eq!(card["styling"]["padding"]["top"], json!("48px"));
    assert_eq!(
        defaults.variants("header").collect::<Vec<_>>(),
        vec!["header1", "header2"]
    );
}

#[test]
fn color_fallback_chain() {
    let styling = json!({"colors": {
        "badge": {"useDefaultColor": true, "globalColorType": "accent"},
    }});
    assert_eq!(
        resolve_color(
            "colors.badge",
            &styling,
            &branding("#0044cc", "#222222", " "),
            GlobalColorType::Primary
        ),
        "#0044cc"
    );
    assert_eq!(
        resolve_color(
            "colors.badge",
            &styling,
            &branding("", "#222222", ""),
            GlobalColorType::Primary
        ),
        BASELINE_COLOR
    );
    assert_eq!(
        resolve_color(
            "colors.badge",
            &styling,
            &branding("#0044cc", "#222222", "#ff8800"),
            GlobalColorType::Primary
        ),
        "#ff8800"
    );
}

#[test]
fn malformed_custom_color_uses_branding() {
    let styling = json!({"colors": {
        "text": {"useDefaultColor": false, "value": "blue"},
        "border": {"useDefaultColor": false, "value": " #A1b2C3 "},
        "icon": {"useDefaultColor": false},
    }});
    let branding = branding("#0044cc", "#222222", "#ff8800");
    assert_eq!(
        resolve_color("colors.text", &styling, &branding, GlobalColorType::Secondary),
        "#222222"
    );
    assert_eq!(
        resolve_color("colors.border", &styling, &branding, GlobalColorType::Primary),
        "#A1b2C3"
    );
    assert_eq!(
        resolve_color("colors.icon", &styling, &branding, GlobalColorType::Accent),
        "#ff8800"
    );
}

#[tokio::test]
async fn resolver_applies_layers_in_priority_order() {
    let mut editor = editor_fixture().await;
    editor.set_component_data(
        "card",
        "cards-1",
        json!({"content": {"title": "Session title", "limit": 5}}),
    );
    editor
        .session_mut()
        .set_current_data("card", json!({"content": {"showPrice": false}}));
    let request = ResolveRequest::new("card", "card1")
        .page("home")
        .id("cards-1")
        .overrides(json!({"content": {"limit": 9}}));
    let merged = editor.resolve(&request);

    assert_eq!(
        merged.sources(),
        &[
            LayerSource::Defaults,
            LayerSource::Persisted,
            LayerSource::Session,
            LayerSource::Current,
            LayerSource::Overrides,
        ]
    );
    assert_eq!(merged.get("content.title"), Some(&json!("Session title")));
    assert_eq!(merged.get("content.limit"), Some(&json!(9)));
    assert_eq!(merged.get("content.showPrice"), Some(&json!(false)));
    assert_eq!(merged.get("content.showAddress"), Some(&json!(true)));
    assert_eq!(merged.get("styling.borderRadius"), Some(&json!("4px")));
    assert_eq!(merged.get("styling.shadow"), Some(&json!("md")));
    assert_eq!(merged.get("styling.shadow.depth"), None);
    assert!(merged.visible());
}

#[tokio::test]
async fn persisted_lookup_is_scoped_to_the_page() {
    let editor = editor_fixture().await;
    let listings = editor.resolve(&ResolveRequest::new("card", "card1").page("listings"));
    assert_eq!(listings.get("content.limit"), Some(&json!(12)));

    let unscoped = editor.resolve(&ResolveRequest::new("card", "card1"));
    assert_eq!(unscoped.get("content.limit"), Some(&json!(3)));

    let missing_page = editor.resolve(&ResolveRequest::new("card", "card1").page("blog"));
    assert_eq!(missing_page.get("content.limit"), Some(&json!(3)));
}

#[tokio::test]
async fn resolved_colors_follow_tenant_branding() {
    let editor = editor_fixture().await;
    let merged = editor.resolve(
        &ResolveRequest::new("halfTextHalfImage", "halfTextHalfImage1")
            .page("home")
            .id("hero-1"),
    );
    let branding = editor.tenant().branding_colors();
    assert_eq!(
        merged.color("colors.background", GlobalColorType::Primary, branding),
        "#112233"
    );
    assert_eq!(
        merged.color("colors.title", GlobalColorType::Accent, branding),
        "#0044cc"
    );
    assert_eq!(
        merged.color("colors.nothing", GlobalColorType::Secondary, branding),
        "#222222"
    );
}

#[tokio::test]
async fn header_defaults_follow_session_variant() {
    let tenant = TenantStore::with_data(TENANT, tenant_fixture().await);
    let mut editor = Editor::new(tenant, ThemeCatalog::new());
    editor
        .session_mut()
        .set_global_variant(GlobalSlot::Header, "header2");
    let merged = editor.resolve(&ResolveRequest::new("header", ""));
    assert_eq!(
        merged.sources(),
        &[LayerSource::Defaults, LayerSource::Persisted]
    );
    assert_eq!(merged.get("content.topBar.visible"), Some(&json!(true)));
    assert_eq!(merged.get("styling.sticky"), Some(&json!(false)));
    assert_eq!(merged.get("content.cta.text"), Some(&json!("Call us")));
}

#[tokio::test]
async fn hydrated_header_keeps_its_variant_defaults() {
    let editor = editor_fixture().await;
    let merged = editor.resolve(&ResolveRequest::new("header", ""));
    assert_eq!(merged.get("variant"), Some(&json!("header1")));
    assert_eq!(merged.get("styling.sticky"), Some(&json!(true)));
    assert_eq!(merged.get("content.cta.text"), Some(&json!("Call us")));
    assert_eq!(merged.get("content.cta.href"), Some(&json!("/contact")));
}
