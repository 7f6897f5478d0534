use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#00C805")).unwrap();
    assert_eq!(c.to_rgba8(), [0, 200, 5, 255]);

    let c: Color = serde_json::from_value(json!("0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0).unwrap());

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9).unwrap());
}

#[test]
fn rejects_malformed_colors() {
    assert!(serde_json::from_value::<Color>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<Color>(json!("#gg0000")).is_err());
    assert!(serde_json::from_value::<Color>(json!([0.1, 0.2])).is_err());
    assert!(serde_json::from_value::<Color>(json!({"r": 2.0, "g": 0.0, "b": 0.0})).is_err());
    assert!(serde_json::from_value::<Color>(json!(42)).is_err());
}

#[test]
fn serializes_as_lowercase_hex() {
    let c = Color::from_hex("#FF3366").unwrap();
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#ff3366ff"));
    let back: Color = serde_json::from_value(json!(c.to_hex())).unwrap();
    assert_eq!(back.to_rgba8(), c.to_rgba8());
}
