use super::*;
use serde_json::json;

fn hood() -> serde_json::Value {
    json!({
        "name": "Robinhood",
        "ticker": "HOOD",
        "brandColors": {
            "background": "#000000",
            "primary": "#00C805",
            "accent": "#CCFF00",
            "text": "#FFFFFF"
        },
        "logo": { "url": "https://cdn.example.com/hood.svg" }
    })
}

#[test]
fn loads_nested_brand_record() {
    let b = BrandProfile::from_value(hood()).unwrap();
    assert_eq!(b.name(), "Robinhood");
    assert_eq!(b.primary().to_rgba8(), [0, 200, 5, 255]);
    assert_eq!(b.background().to_rgba8(), [0, 0, 0, 255]);
    assert_eq!(b.color("accent").unwrap().to_rgba8(), [204, 255, 0, 255]);
    assert_eq!(b.logo_url(), Some("https://cdn.example.com/hood.svg"));
    assert_eq!(b.palette().len(), 4);
}

#[test]
fn top_level_background_color_overrides_palette() {
    let mut v = hood();
    v["backgroundColor"] = json!("#101010");
    let b = BrandProfile::from_value(v).unwrap();
    assert_eq!(b.background().to_rgba8(), [16, 16, 16, 255]);
    assert_eq!(b.color("background"), Some(b.background()));
}

#[test]
fn missing_required_fields_are_invalid_brand_profile() {
    let mut v = hood();
    v["brandColors"].as_object_mut().unwrap().remove("primary");
    let err = BrandProfile::from_value(v).unwrap_err();
    assert!(matches!(err, OverlayError::InvalidBrandProfile(_)));
    assert!(err.to_string().contains("primary"));

    let mut v = hood();
    v.as_object_mut().unwrap().remove("name");
    assert!(matches!(
        BrandProfile::from_value(v),
        Err(OverlayError::InvalidBrandProfile(_))
    ));

    let mut v = hood();
    v["name"] = json!("   ");
    assert!(matches!(
        BrandProfile::from_value(v),
        Err(OverlayError::InvalidBrandProfile(_))
    ));
}

#[test]
fn mistyped_fields_are_invalid_brand_profile() {
    let mut v = hood();
    v["brandColors"]["accent"] = json!("not-a-color");
    let err = BrandProfile::from_value(v).unwrap_err();
    assert!(err.to_string().contains("brandColors.accent"));

    let mut v = hood();
    v["brandColors"] = json!(["#000000"]);
    assert!(matches!(
        BrandProfile::from_value(v),
        Err(OverlayError::InvalidBrandProfile(_))
    ));

    let mut v = hood();
    v["name"] = json!(7);
    assert!(matches!(
        BrandProfile::from_value(v),
        Err(OverlayError::InvalidBrandProfile(_))
    ));
}

#[test]
fn blank_or_null_logo_is_absent() {
    let mut v = hood();
    v["logo"] = json!({ "url": null });
    assert_eq!(BrandProfile::from_value(v).unwrap().logo_url(), None);

    let mut v = hood();
    v["logo"] = json!({ "url": "" });
    assert_eq!(BrandProfile::from_value(v).unwrap().logo_url(), None);
}

#[test]
fn reader_rejects_broken_json() {
    let err = BrandProfile::from_reader("{ \"name\": ".as_bytes()).unwrap_err();
    assert!(matches!(err, OverlayError::InvalidBrandProfile(_)));
}

#[test]
fn builder_keeps_palette_in_sync() {
    let black = Color::from_hex("#000000").unwrap();
    let green = Color::from_hex("#00c805").unwrap();
    let b = BrandProfile::new("Acme", black, black)
        .unwrap()
        .with_color("primary", green)
        .with_logo_url("logo.png");
    assert_eq!(b.primary(), green);
    assert_eq!(b.color("primary"), Some(green));
    assert_eq!(b.logo_url(), Some("logo.png"));
    assert!(BrandProfile::new("", black, black).is_err());
}
