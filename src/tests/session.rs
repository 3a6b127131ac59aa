use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::{
    defaults::DefaultDataRegistry,
    model::{ComponentInstance, GlobalComponentsData, GridPlacement},
    session::{EditorSession, GlobalSlot, Notification, SessionEvent},
    theme::install_global,
};

fn recorder(session: &mut EditorSession) -> Arc<Mutex<Vec<Notification>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |notification| sink.lock().unwrap().push(notification.clone()));
    seen
}

fn components(positions: &[Option<usize>]) -> Vec<ComponentInstance> {
    positions
        .iter()
        .enumerate()
        .map(|(index, position)| ComponentInstance {
            position: *position,
            ..ComponentInstance::new(format!("c{index}"), "card", "card1", json!({}))
        })
        .collect()
}

#[test]
fn ensure_never_clobbers_edits() {
    let mut session = EditorSession::new();
    assert!(session.ensure_component_variant("card", "c1", json!({"content": {"limit": 1}})));
    session.set_component_data("card", "c1", json!({"content": {"limit": 7}}));
    assert!(!session.ensure_component_variant("card", "c1", json!({"content": {"limit": 1}})));
    assert_eq!(
        session.component_data("card", "c1"),
        &json!({"content": {"limit": 7}})
    );
    assert_eq!(session.component_data("card", "missing"), &json!({}));
    assert_eq!(session.component_ids("card").collect::<Vec<_>>(), vec!["c1"]);
}

#[test]
fn page_positions_are_normalized() {
    let mut session = EditorSession::new();
    assert!(session.set_page_components_for_page("home", components(&[Some(5), None, Some(9)])));
    for (index, component) in session.page_components("home").iter().enumerate() {
        assert_eq!(component.position, Some(index));
        assert_eq!(component.layout, Some(GridPlacement::at_row(index)));
    }
}

#[test]
fn unchanged_page_is_not_renotified() {
    let mut session = EditorSession::new();
    let seen = recorder(&mut session);
    assert!(session.set_page_components_for_page("home", components(&[None, None])));
    let version = session.version();
    assert!(!session.set_page_components_for_page("home", components(&[Some(0), Some(1)])));
    assert_eq!(session.version(), version);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn force_update_always_notifies() {
    let mut session = EditorSession::new();
    session.set_page_components_for_page("home", components(&[None]));
    let before = session.page_version("home");
    let seen = recorder(&mut session);
    let version = session.force_update_page_components("home", components(&[None]));
    assert!(version > before);
    assert_eq!(session.page_version("home"), version);
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[Notification {
            version,
            event: SessionEvent::PageChanged {
                page: "home".into(),
                forced: true,
            },
        }]
    );
}

#[test]
fn clear_wipes_every_bucket() {
    let mut session = EditorSession::new();
    session.ensure_component_variant("card", "c1", json!({}));
    session.set_current_data("card", json!({"content": {}}));
    session.set_page_components_for_page("home", components(&[None]));
    session.set_global_variant(GlobalSlot::Header, "header1");
    session.set_global_data(GlobalSlot::Header, json!({"content": {}}));
    let seen = recorder(&mut session);

    let version = session.clear_all_states();
    assert!(session.component_data_opt("card", "c1").is_none());
    assert!(session.current_data("card").is_none());
    assert!(!session.has_page("home"));
    assert!(session.global_variant(GlobalSlot::Header).is_none());
    assert!(session.global_components_data().is_empty());
    assert_eq!(session.page_version("home"), version);
    assert_eq!(seen.lock().unwrap().last().unwrap().event, SessionEvent::Cleared);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut session = EditorSession::new();
    let seen = Arc::new(Mutex::new(0));
    let sink = seen.clone();
    let id = session.subscribe(move |_| *sink.lock().unwrap() += 1);
    session.set_component_data("card", "c1", json!({}));
    assert!(session.unsubscribe(id));
    session.set_component_data("card", "c1", json!({"visible": false}));
    assert_eq!(*seen.lock().unwrap(), 1);
    assert!(!session.unsubscribe(id));
}

#[test]
fn global_data_embeds_variant() {
    let mut session = EditorSession::new();
    session.set_global_variant(GlobalSlot::Footer, "footer2");
    session.set_global_data(GlobalSlot::Footer, json!({"content": {"copyright": "acme"}}));
    let global = session.global_components_data();
    assert!(global.header.is_none());
    assert_eq!(
        global.footer,
        Some(json!({"content": {"copyright": "acme"}, "variant": "footer2"}))
    );
    assert_eq!(global.footer_variant(), Some("footer2"));
}

#[test]
fn snapshot_carries_live_edits() {
    let mut session = EditorSession::new();
    session.set_page_components_for_page("home", components(&[None, None]));
    session.set_component_data("card", "c1", json!({"content": {"limit": 2}}));
    let snapshot = session.snapshot_pages();
    let home = &snapshot["home"];
    assert_eq!(home[0].data, json!({}));
    assert_eq!(home[1].data, json!({"content": {"limit": 2}}));
}

#[test]
fn pages_sharing_an_id_keep_their_own_data() {
    let mut session = EditorSession::new();
    for (page, title) in [("home", "Home hero"), ("about", "About hero")] {
        let hero = ComponentInstance::new(
            "hero",
            "halfTextHalfImage",
            "halfTextHalfImage1",
            json!({"content": {"title": title}}),
        );
        session.load_component_data("halfTextHalfImage", "hero", hero.data.clone());
        session.set_page_components_for_page(page, vec![hero]);
    }
    assert!(!session.is_edited("halfTextHalfImage", "hero"));
    let title = |snapshot: &indexmap::IndexMap<String, Vec<ComponentInstance>>, page: &str| {
        snapshot[page][0].data["content"]["title"].clone()
    };
    let snapshot = session.snapshot_pages();
    assert_eq!(title(&snapshot, "home"), json!("Home hero"));
    assert_eq!(title(&snapshot, "about"), json!("About hero"));

    session.set_component_data(
        "halfTextHalfImage",
        "hero",
        json!({"content": {"title": "Edited hero"}}),
    );
    let snapshot = session.snapshot_pages();
    assert_eq!(title(&snapshot, "home"), json!("Edited hero"));
    assert_eq!(title(&snapshot, "about"), json!("Edited hero"));
}

#[test]
fn header_is_installed_before_footer() {
    let mut session = EditorSession::new();
    let seen = recorder(&mut session);
    let global = GlobalComponentsData {
        header: Some(json!({"variant": "header2", "content": {"cta": {"text": "Call"}}})),
        footer: Some(json!({"content": {"copyright": "acme"}})),
        extra: Default::default(),
    };
    install_global(&mut session, &DefaultDataRegistry::builtin(), &global);

    let seen = seen.lock().unwrap();
    let events = seen
        .iter()
        .map(|notification| notification.event.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        events,
        vec![
            SessionEvent::VariantChanged {
                slot: GlobalSlot::Header,
                variant: "header2".into(),
            },
            SessionEvent::GlobalChanged {
                slot: GlobalSlot::Header,
            },
            SessionEvent::VariantChanged {
                slot: GlobalSlot::Footer,
                variant: "footer1".into(),
            },
            SessionEvent::GlobalChanged {
                slot: GlobalSlot::Footer,
            },
        ]
    );
    let versions = seen
        .iter()
        .map(|notification| notification.version)
        .collect::<Vec<_>>();
    assert_eq!(versions, vec![1, 2, 3, 4]);
    assert_eq!(
        session.global_data(GlobalSlot::Footer).unwrap()["variant"],
        json!("footer1")
    );
}
