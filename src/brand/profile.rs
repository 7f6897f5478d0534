use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use serde::Deserialize;

use crate::{
    brand::color::Color,
    foundation::error::{OverlayError, OverlayResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Immutable brand style record referenced by overlay renderers.
///
/// Loaded once per video, validated on load and shared by reference (see
/// [`crate::Timeline::brand`]). Nothing in the engine mutates a profile after construction.
pub struct BrandProfile {
    name: String,
    background: Color,
    primary: Color,
    palette: BTreeMap<String, Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrandDef {
    name: Option<String>,
    #[serde(default)]
    brand_colors: BTreeMap<String, serde_json::Value>,
    background_color: Option<serde_json::Value>,
    logo: Option<LogoDef>,
    logo_url: Option<String>,
}

#[derive(Deserialize)]
struct LogoDef {
    url: Option<String>,
}

const BACKGROUND: &str = "background";
const PRIMARY: &str = "primary";

impl BrandProfile {
    /// Build a profile from its required fields.
    pub fn new(name: impl Into<String>, background: Color, primary: Color) -> OverlayResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(OverlayError::brand("brand name must be non-empty"));
        }
        let palette = BTreeMap::from([
            (BACKGROUND.to_owned(), background),
            (PRIMARY.to_owned(), primary),
        ]);
        Ok(Self {
            name,
            background,
            primary,
            palette,
            logo_url: None,
        })
    }

    /// Attach a logo reference; blank URLs clear it.
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.logo_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    /// Add or replace a semantic palette color.
    ///
    /// The `background` and `primary` roles update the dedicated fields as well.
    pub fn with_color(mut self, role: impl Into<String>, color: Color) -> Self {
        let role = role.into();
        match role.as_str() {
            BACKGROUND => self.background = color,
            PRIMARY => self.primary = color,
            _ => {}
        }
        self.palette.insert(role, color);
        self
    }

    /// Validate a loosely-typed brand record.
    pub fn from_value(value: serde_json::Value) -> OverlayResult<Self> {
        let def: BrandDef = serde_json::from_value(value)
            .map_err(|e| OverlayError::brand(format!("malformed brand record: {e}")))?;

        let name = def
            .name
            .ok_or_else(|| OverlayError::brand("missing required field 'name'"))?;

        let mut palette = BTreeMap::new();
        for (role, raw) in def.brand_colors {
            let color = parse_color(&format!("brandColors.{role}"), raw)?;
            palette.insert(role, color);
        }
        if let Some(raw) = def.background_color {
            let color = parse_color("backgroundColor", raw)?;
            palette.insert(BACKGROUND.to_owned(), color);
        }

        let background = *palette.get(BACKGROUND).ok_or_else(|| {
            OverlayError::brand("missing required color 'brandColors.background'")
        })?;
        let primary = *palette
            .get(PRIMARY)
            .ok_or_else(|| OverlayError::brand("missing required color 'brandColors.primary'"))?;

        let mut profile = Self::new(name, background, primary)?;
        profile.palette = palette;

        let logo_url = def.logo.and_then(|l| l.url).or(def.logo_url);
        if let Some(url) = logo_url {
            profile = profile.with_logo_url(url);
        }
        Ok(profile)
    }

    /// Parse and validate a brand record from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        let value: serde_json::Value = serde_json::from_reader(r)
            .map_err(|e| OverlayError::brand(format!("parse brand JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parse and validate a brand record from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open brand profile '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Display name of the brand (company name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Primary accent color.
    pub fn primary(&self) -> Color {
        self.primary
    }

    /// Look up a semantic palette color by role (`"background"`, `"primary"`, `"accent"`, ...).
    pub fn color(&self, role: &str) -> Option<Color> {
        self.palette.get(role).copied()
    }

    /// All palette entries, sorted by role.
    pub fn palette(&self) -> &BTreeMap<String, Color> {
        &self.palette
    }

    /// Optional logo reference.
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }
}

fn parse_color(field: &str, raw: serde_json::Value) -> OverlayResult<Color> {
    serde_json::from_value(raw).map_err(|e| OverlayError::brand(format!("{field}: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/brand/profile.rs"]
mod tests;
