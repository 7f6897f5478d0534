use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color with normalized `[0, 1]` channels.
///
/// Deserializes from `#RRGGBB`, `#RRGGBBAA`, `{ "r", "g", "b", "a"? }` or `[r, g, b(, a)]`;
/// always serializes as a lowercase `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Build a color, rejecting channels outside `[0, 1]` or non-finite values.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Result<Self, String> {
        for (name, v) in [("r", r), ("g", g), ("b", b), ("a", a)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(format!("color channel '{name}' must be within [0, 1], got {v}"));
            }
        }
        Ok(Self { r, g, b, a })
    }

    /// Parse a `#RRGGBB` / `#RRGGBBAA` string (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        parse_hex(s)
    }

    /// Quantize to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// Lowercase `#rrggbbaa` representation.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        let c = match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s),
            Repr::RgbaObj { r, g, b, a } => Self::rgba(r, g, b, a),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Self::rgba(*r, *g, *b, 1.0),
                [r, g, b, a] => Self::rgba(*r, *g, *b, *a),
                _ => Err("rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])".to_owned()),
            },
        };
        c.map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Color {
        r: f64::from(r) / 255.0,
        g: f64::from(g) / 255.0,
        b: f64::from(b) / 255.0,
        a: f64::from(a) / 255.0,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/brand/color.rs"]
mod tests;
