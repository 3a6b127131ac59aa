use serde_json::json;

use super::{DefaultDataRegistry, extend};

pub(super) fn register(registry: &mut DefaultDataRegistry) {
    registry
        .register("card", "card1", card1)
        .register("card", "card5", card5)
        .register("partners", "partners1", partners1)
        .register("stepsSection", "stepsSection1", steps_section1)
        .register("halfTextHalfImage", "halfTextHalfImage1", half_text_half_image1)
        .register("halfTextHalfImage", "halfTextHalfImage2", half_text_half_image2);
}

fn card_typography() -> serde_json::Value {
    json!({
        "title": { "fontSize": "20px", "fontWeight": "600", "fontFamily": "inherit", "color": "#111827" },
        "price": { "fontSize": "18px", "fontWeight": "700", "fontFamily": "inherit" },
        "meta": { "fontSize": "13px", "fontWeight": "400", "fontFamily": "inherit" },
    })
}

fn card1() -> serde_json::Value {
    extend(json!({
        "content": {
            "title": "Featured properties",
            "source": "latest",
            "limit": 6,
            "showPrice": true,
            "showAddress": true,
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": false, "value": "#ffffff" },
                "price": { "useDefaultColor": true, "globalColorType": "primary" },
                "badge": { "useDefaultColor": true, "globalColorType": "accent" },
            },
            "borderRadius": "12px",
            "shadow": "md",
        },
        "typography": card_typography(),
        "layout": { "columns": 3, "gap": "24px" },
        "responsive": {
            "mobile": { "columns": 1 },
            "tablet": { "columns": 2 },
        },
    }))
}

fn card5() -> serde_json::Value {
    extend(json!({
        "content": {
            "title": "Properties for rent",
            "source": "rentals",
            "limit": 4,
            "showPrice": true,
            "showAddress": false,
            "imageRatio": "4:3",
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": true, "globalColorType": "secondary" },
                "overlay": { "useDefaultColor": false, "value": "#000000" },
                "price": { "useDefaultColor": true, "globalColorType": "accent" },
            },
            "borderRadius": "0px",
            "shadow": "none",
        },
        "typography": card_typography(),
        "layout": { "columns": 4, "gap": "16px" },
        "responsive": {
            "mobile": { "columns": 1 },
            "tablet": { "columns": 2 },
        },
    }))
}

fn partners1() -> serde_json::Value {
    extend(json!({
        "content": {
            "title": "Our partners",
            "logos": [],
            "autoplay": true,
        },
        "styling": {
            "colors": {
                "background": { "useDefaultColor": false, "value": "#f9fafb" },
            },
            "grayscale": true,
        },
        "layout": { "columns": 6, "gap": "32px" },
        "responsive": {
            "mobile": { "columns": 2 },
            "tablet": { "columns": 4 },
        },
    }))
}

fn steps_section1() -> serde_json::Value {
    extend(json!({
        "content": {
            "title": "How it works",
            "steps": [
                { "title": "Search", "description": "Browse listings that match your needs." },
                { "title": "Visit", "description": "Book a viewing at a time that suits you." },
                { "title": "Move in", "description": "Sign online and collect your keys." },
            ],
        },
        "styling": {
            "colors": {
                "icon": { "useDefaultColor": true, "globalColorType": "primary" },
                "connector": { "useDefaultColor": true, "globalColorType": "accent" },
            },
        },
        "typography": {
            "stepTitle": { "fontSize": "18px", "fontWeight": "600", "fontFamily": "inherit" },
        },
        "layout": { "columns": 3, "direction": "horizontal" },
        "responsive": {
            "mobile": { "columns": 1, "direction": "vertical" },
        },
    }))
}

fn half_text_half_image(image_side: &str) -> serde_json::Value {
    json!({
        "content": {
            "title": "",
            "description": "",
            "image": { "src": "", "alt": "" },
            "button": { "text": "Learn more", "href": "#", "visible": true },
        },
        "styling": {
            "colors": {
                "button": { "useDefaultColor": true, "globalColorType": "primary" },
            },
            "imageRadius": "16px",
        },
        "layout": { "columns": 2, "imageSide": image_side, "verticalAlign": "center" },
        "responsive": {
            "mobile": { "columns": 1, "imageFirst": true },
        },
    })
}

fn half_text_half_image1() -> serde_json::Value {
    extend(half_text_half_image("right"))
}

fn half_text_half_image2() -> serde_json::Value {
    let mut data = half_text_half_image("left");
    crate::merge::deep_merge(
        &mut data,
        &json!({
            "styling": {
                "colors": {
                    "background": { "useDefaultColor": true, "globalColorType": "secondary" },
                },
            },
            "settings": { "parallax": true },
        }),
    );
    extend(data)
}
