use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Coarse stacking bucket; higher classes are drawn later (on top).
pub enum LayerClass {
    /// The underlying audio/video track. Never produced by an overlay event.
    BaseMedia = 0,
    /// Title cards, metric call-outs and speaker labels.
    Transient = 1,
    /// The persistent logo watermark, kept above transient overlays.
    Watermark = 2,
    /// The closing call-to-action, above everything else.
    Terminal = 3,
}

impl LayerClass {
    /// Numeric stacking rank (`0` = bottom).
    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Direction of a metric change, used to pick the call-out accent.
pub enum ChangeSign {
    /// Improvement (e.g. `+100% YoY`).
    Positive,
    /// Decline.
    Negative,
    /// Flat or non-directional.
    #[default]
    Neutral,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Screen anchor for positioned overlays.
pub enum ScreenPosition {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Frame center.
    #[default]
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Entrance animation requested for a metric call-out.
pub enum AnimationStyle {
    /// Spring bounce in place.
    #[default]
    Bounce,
    /// Slide up from below.
    SlideUp,
    /// Scale up from a point.
    Scale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Relative watermark size.
pub enum SizeClass {
    /// Small corner mark.
    #[default]
    Small,
    /// Medium mark.
    Medium,
    /// Large mark.
    Large,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Opening (or chapter) title card.
pub struct TitleCard {
    /// Headline text, usually the company name or chapter title.
    pub text: String,
    /// Fiscal quarter label such as `Q3`.
    pub quarter_label: String,
    /// Fiscal year.
    pub year: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Key-metric call-out.
pub struct MetricOverlay {
    /// Metric label, e.g. `Revenue`.
    pub metric_name: String,
    /// Formatted value, e.g. `$1.3B`.
    pub value: String,
    /// Change annotation, e.g. `+100% YoY`.
    #[serde(default)]
    pub change_label: String,
    /// Direction of the change.
    #[serde(default)]
    pub change_sign: ChangeSign,
    /// Anchor on screen.
    #[serde(default)]
    pub screen_position: ScreenPosition,
    /// Entrance animation.
    #[serde(default)]
    pub animation_style: AnimationStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Lower-third speaker label.
pub struct SpeakerLabel {
    /// Speaker name.
    pub person_name: String,
    /// Speaker role, e.g. `CFO`.
    #[serde(default)]
    pub person_title: String,
    /// Anchor on screen.
    #[serde(default = "bottom_left")]
    pub screen_position: ScreenPosition,
    /// Whether to show a headshot next to the label.
    #[serde(default)]
    pub show_photo: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Persistent brand logo mark.
pub struct LogoWatermark {
    /// Anchor on screen.
    #[serde(default = "top_left")]
    pub screen_position: ScreenPosition,
    /// Relative size.
    #[serde(default)]
    pub size_class: SizeClass,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Closing call-to-action card.
pub struct CallToAction {
    /// Main message.
    pub message: String,
    /// Link shown under the message.
    pub url: String,
    /// Whether to show a subscribe prompt.
    #[serde(default)]
    pub show_subscribe: bool,
}

pub(crate) fn bottom_left() -> ScreenPosition {
    ScreenPosition::BottomLeft
}

pub(crate) fn top_left() -> ScreenPosition {
    ScreenPosition::TopLeft
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Kind-specific overlay payload.
pub enum OverlayKind {
    /// See [`TitleCard`].
    TitleCard(TitleCard),
    /// See [`MetricOverlay`].
    MetricOverlay(MetricOverlay),
    /// See [`SpeakerLabel`].
    SpeakerLabel(SpeakerLabel),
    /// See [`LogoWatermark`].
    LogoWatermark(LogoWatermark),
    /// See [`CallToAction`].
    CallToAction(CallToAction),
}

impl OverlayKind {
    /// Stacking class implied by the variant.
    pub fn layer_class(&self) -> LayerClass {
        match self {
            Self::TitleCard(_) | Self::MetricOverlay(_) | Self::SpeakerLabel(_) => {
                LayerClass::Transient
            }
            Self::LogoWatermark(_) => LayerClass::Watermark,
            Self::CallToAction(_) => LayerClass::Terminal,
        }
    }

    /// Stable snake_case name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TitleCard(_) => "title_card",
            Self::MetricOverlay(_) => "metric_overlay",
            Self::SpeakerLabel(_) => "speaker_label",
            Self::LogoWatermark(_) => "logo_watermark",
            Self::CallToAction(_) => "call_to_action",
        }
    }

    /// Check payload invariants, returning the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        fn non_empty(field: &str, v: &str) -> Result<(), String> {
            if v.trim().is_empty() {
                return Err(format!("{field} must be non-empty"));
            }
            Ok(())
        }

        match self {
            Self::TitleCard(t) => non_empty("title text", &t.text),
            Self::MetricOverlay(m) => {
                non_empty("metric name", &m.metric_name)?;
                non_empty("metric value", &m.value)
            }
            Self::SpeakerLabel(s) => non_empty("speaker name", &s.person_name),
            Self::LogoWatermark(l) => {
                if !l.opacity.is_finite() || !(0.0..=1.0).contains(&l.opacity) {
                    return Err(format!(
                        "watermark opacity must be within [0, 1], got {}",
                        l.opacity
                    ));
                }
                Ok(())
            }
            Self::CallToAction(c) => non_empty("call-to-action message", &c.message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Authored time window, before conversion and clipping.
///
/// Externally authored windows may start before zero or run past the end of the timeline;
/// [`crate::TimelineBuilder::build`] clips them.
pub enum WindowSpec {
    /// Window in seconds, converted with [`crate::to_frame`].
    Seconds {
        /// Start time in seconds (may be negative).
        start_secs: f64,
        /// Duration in seconds.
        duration_secs: f64,
    },
    /// Window already expressed in frames.
    Frames {
        /// Start frame (may be negative).
        start_frame: i64,
        /// Duration in frames.
        duration_frames: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One authored overlay event: a window plus a payload.
pub struct OverlayEvent {
    /// When the overlay is visible.
    pub window: WindowSpec,
    /// What is shown.
    pub payload: OverlayKind,
}

impl OverlayEvent {
    /// Event windowed in seconds.
    pub fn at_secs(start_secs: f64, duration_secs: f64, payload: OverlayKind) -> Self {
        Self {
            window: WindowSpec::Seconds {
                start_secs,
                duration_secs,
            },
            payload,
        }
    }

    /// Event windowed in frames.
    pub fn at_frames(start_frame: i64, duration_frames: i64, payload: OverlayKind) -> Self {
        Self {
            window: WindowSpec::Frames {
                start_frame,
                duration_frames,
            },
            payload,
        }
    }

    /// Stacking class of the payload.
    pub fn layer_class(&self) -> LayerClass {
        self.payload.layer_class()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/event.rs"]
mod tests;
