use serde_json::json;

use super::{DefaultDataRegistry, extend};

pub(super) fn register(registry: &mut DefaultDataRegistry) {
    registry
        .register("header", "header1", header1)
        .register("header", "header2", header2)
        .register("footer", "footer1", footer1)
        .register("footer", "footer2", footer2);
}

fn navigation() -> serde_json::Value {
    json!([
        { "label": "Home", "href": "/" },
        { "label": "Properties", "href": "/properties" },
        { "label": "About", "href": "/about" },
        { "label": "Contact", "href": "/contact" },
    ])
}

fn header1() -> serde_json::Value {
    extend(json!({
        "variant": "header1",
        "content": {
            "logo": { "src": "", "alt": "Logo", "text": "" },
            "menu": navigation(),
            "cta": { "text": "Contact us", "href": "/contact", "visible": true },
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": false, "value": "#ffffff" },
                "link": { "useDefaultColor": true, "globalColorType": "secondary" },
                "linkHover": { "useDefaultColor": true, "globalColorType": "primary" },
                "ctaBackground": { "useDefaultColor": true, "globalColorType": "primary" },
            },
            "padding": { "top": "16px", "bottom": "16px" },
            "sticky": true,
            "shadow": "sm",
        },
        "typography": {
            "link": { "fontSize": "15px", "fontWeight": "500", "fontFamily": "inherit" },
        },
        "layout": { "height": "72px", "alignment": "space-between" },
        "responsive": {
            "mobile": { "menu": "drawer", "height": "64px" },
        },
    }))
}

fn header2() -> serde_json::Value {
    extend(json!({
        "variant": "header2",
        "content": {
            "logo": { "src": "", "alt": "Logo", "text": "" },
            "menu": navigation(),
            "topBar": { "phone": "", "email": "", "visible": true },
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": true, "globalColorType": "primary" },
                "link": { "useDefaultColor": false, "value": "#ffffff" },
                "topBarBackground": { "useDefaultColor": true, "globalColorType": "secondary" },
            },
            "padding": { "top": "12px", "bottom": "12px" },
            "sticky": false,
        },
        "typography": {
            "link": { "fontSize": "14px", "fontWeight": "600", "fontFamily": "inherit" },
        },
        "layout": { "height": "88px", "alignment": "center" },
        "responsive": {
            "mobile": { "menu": "dropdown", "height": "64px" },
        },
    }))
}

fn footer1() -> serde_json::Value {
    extend(json!({
        "variant": "footer1",
        "content": {
            "about": { "title": "About us", "text": "" },
            "links": navigation(),
            "social": [],
            "copyright": "",
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": false, "value": "#111827" },
                "text": { "useDefaultColor": false, "value": "#f9fafb" },
                "link": { "useDefaultColor": true, "globalColorType": "accent" },
            },
        },
        "layout": { "columns": 3 },
        "responsive": {
            "mobile": { "columns": 1 },
            "tablet": { "columns": 2 },
        },
    }))
}

fn footer2() -> serde_json::Value {
    extend(json!({
        "variant": "footer2",
        "content": {
            "newsletter": { "title": "Stay informed", "placeholder": "Email address", "visible": true },
            "links": navigation(),
            "copyright": "",
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": true, "globalColorType": "primary" },
                "text": { "useDefaultColor": false, "value": "#ffffff" },
                "button": { "useDefaultColor": true, "globalColorType": "accent" },
            },
        },
        "layout": { "columns": 2 },
    }))
}
