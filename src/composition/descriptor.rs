use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    composition::{insights::InsightOptions, timeline::Timeline},
    foundation::core::Fps,
    foundation::error::{OverlayError, OverlayResult},
};

/// Pixel formats with 2x2 chroma subsampling; both dimensions must be even.
const CHROMA_420: &[&str] = &["yuv420p", "yuv420p10le", "nv12"];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Encoder-facing composition parameters.
///
/// Everything except the frame rate and total frame count is passed through to the encoder
/// untouched.
pub struct CompositionDescriptor {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frame rate; must equal the timeline's.
    pub fps: Fps,
    /// Length in frames; must equal the timeline's.
    pub total_frames: u64,
    /// Video codec name, e.g. `h264`.
    pub codec: String,
    /// Pixel format, e.g. `yuv420p`.
    pub pixel_format: String,
    /// Intermediate frame image format, e.g. `jpeg`.
    pub image_format: String,
    /// Where rendered output goes.
    pub output_dir: PathBuf,
    /// Whether existing output may be replaced.
    pub overwrite: bool,
}

impl CompositionDescriptor {
    /// Check the descriptor on its own.
    pub fn check(&self) -> OverlayResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OverlayError::validation(format!(
                "descriptor dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.total_frames == 0 {
            return Err(OverlayError::validation("descriptor total_frames must be > 0"));
        }
        if self.codec.trim().is_empty() {
            return Err(OverlayError::validation("descriptor codec must be non-empty"));
        }
        if CHROMA_420.contains(&self.pixel_format.as_str())
            && (self.width % 2 != 0 || self.height % 2 != 0)
        {
            return Err(OverlayError::validation(format!(
                "{} requires even dimensions, got {}x{}",
                self.pixel_format, self.width, self.height
            )));
        }
        Ok(())
    }

    /// See [`validate`].
    pub fn validate(&self, timeline: &Timeline) -> OverlayResult<()> {
        validate(self, timeline)
    }
}

/// Confirm the descriptor and timeline share one time base.
///
/// Frame rate and total frame count must match exactly; nothing is coerced.
#[tracing::instrument(
    skip_all,
    fields(fps = descriptor.fps.get(), total_frames = descriptor.total_frames)
)]
pub fn validate(descriptor: &CompositionDescriptor, timeline: &Timeline) -> OverlayResult<()> {
    descriptor.check()?;
    if descriptor.fps != timeline.fps() {
        return Err(OverlayError::MismatchedFrameRate {
            descriptor: descriptor.fps.get(),
            timeline: timeline.fps().get(),
        });
    }
    if descriptor.total_frames != timeline.total_frames() {
        return Err(OverlayError::MismatchedDuration {
            descriptor: descriptor.total_frames,
            timeline: timeline.total_frames(),
        });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Render settings loaded from a JSON config file.
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: u32,
    /// Video codec name.
    pub codec: String,
    /// Pixel format.
    pub pixel_format: String,
    /// Intermediate frame image format.
    pub image_format: String,
    /// Where rendered output goes.
    pub output_dir: PathBuf,
    /// Whether existing output may be replaced.
    pub overwrite: bool,
    /// Overlay window lengths used when compiling insight data.
    pub layout: InsightOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            codec: "h264".to_owned(),
            pixel_format: "yuv420p".to_owned(),
            image_format: "jpeg".to_owned(),
            output_dir: PathBuf::from("out"),
            overwrite: true,
            layout: InsightOptions::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from a JSON reader; absent keys keep their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        let value: serde_json::Value = serde_json::from_reader(r)
            .map_err(|e| OverlayError::serde(format!("parse render config JSON: {e}")))?;
        // Derived struct impls also take sequences; a config is only ever an object.
        if !value.is_object() {
            return Err(OverlayError::serde(
                "parse render config JSON: expected an object",
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| OverlayError::serde(format!("parse render config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open render config '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// The configured frame rate.
    pub fn fps(&self) -> OverlayResult<Fps> {
        Fps::new(self.fps)
    }

    /// Descriptor for a composition of `total_frames` frames.
    pub fn descriptor(&self, total_frames: u64) -> OverlayResult<CompositionDescriptor> {
        let descriptor = CompositionDescriptor {
            width: self.width,
            height: self.height,
            fps: self.fps()?,
            total_frames,
            codec: self.codec.clone(),
            pixel_format: self.pixel_format.clone(),
            image_format: self.image_format.clone(),
            output_dir: self.output_dir.clone(),
            overwrite: self.overwrite,
        };
        descriptor.check()?;
        Ok(descriptor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/descriptor.rs"]
mod tests;
