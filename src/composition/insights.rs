use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::Context as _;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::{
    brand::profile::BrandProfile,
    composition::{
        event::{
            AnimationStyle, CallToAction, ChangeSign, LogoWatermark, MetricOverlay, OverlayEvent,
            OverlayKind, ScreenPosition, SizeClass, SpeakerLabel, TitleCard, WindowSpec,
            bottom_left, top_left,
        },
        timeline::{MediaSpec, TimelineBuilder, TimelineReport},
    },
    foundation::core::{Fps, to_frame},
    foundation::error::{OverlayError, OverlayResult},
};

/// One item of an insight list, decoded leniently.
///
/// A record that does not match the expected shape does not fail the whole document; it is
/// kept as [`Record::Malformed`] and later reported as [`OverlayError::InvalidEvent`].
#[derive(Clone, Debug, PartialEq)]
pub enum Record<T> {
    /// Well-formed record.
    Parsed(T),
    /// Record that failed to decode, with the decoder message.
    Malformed(String),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(raw) {
            Ok(v) => Self::Parsed(v),
            Err(e) => Self::Malformed(e.to_string()),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Chapter marker from the insight document.
pub struct Chapter {
    /// Start time in seconds.
    pub timestamp: f64,
    /// Chapter title.
    pub title: String,
    /// Longer description; not shown on screen.
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// A key metric mentioned at some point of the call.
pub struct MetricMoment {
    /// When the metric is mentioned, in seconds.
    pub timestamp: f64,
    /// Metric label.
    pub metric: String,
    /// Formatted value.
    pub value: String,
    /// Change annotation.
    #[serde(default)]
    pub change: String,
    /// Direction of the change.
    #[serde(default, alias = "changeType")]
    pub change_type: ChangeSign,
    /// Anchor on screen.
    #[serde(default)]
    pub position: ScreenPosition,
    /// Entrance animation.
    #[serde(default, alias = "animationStyle")]
    pub animation_style: AnimationStyle,
    /// Per-item display length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// A speaker taking the floor.
pub struct SpeakerMoment {
    /// When the speaker starts, in seconds.
    pub timestamp: f64,
    /// Speaker name.
    pub name: String,
    /// Speaker role.
    #[serde(default)]
    pub title: String,
    /// Anchor on screen.
    #[serde(default = "bottom_left")]
    pub position: ScreenPosition,
    /// Whether to show a headshot.
    #[serde(default, alias = "showPhoto")]
    pub show_photo: bool,
    /// Per-item display length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Watermark placement overrides.
pub struct LogoPlacement {
    /// Anchor on screen.
    #[serde(default = "top_left")]
    pub position: ScreenPosition,
    /// Relative size.
    #[serde(default)]
    pub size: SizeClass,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_logo_opacity")]
    pub opacity: f64,
}

fn default_logo_opacity() -> f64 {
    0.8
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            position: ScreenPosition::TopLeft,
            size: SizeClass::Small,
            opacity: default_logo_opacity(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Closing call-to-action text.
pub struct CallToActionDef {
    /// Main message.
    pub message: String,
    /// Link shown under the message.
    pub url: String,
    /// Whether to show a subscribe prompt.
    #[serde(default, alias = "showSubscribe")]
    pub show_subscribe: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Insight document for one earnings call video.
pub struct InsightData {
    /// Title card text; defaults to the brand name.
    #[serde(default)]
    pub company: Option<String>,
    /// Fiscal quarter label, e.g. `Q3`.
    pub quarter: String,
    /// Fiscal year.
    pub year: u16,
    /// Length of the whole video in seconds.
    #[serde(alias = "durationSecs")]
    pub duration_secs: f64,
    /// Base media reference.
    #[serde(default, alias = "mediaSource")]
    pub media_source: Option<String>,
    /// Chapter markers.
    #[serde(default)]
    pub chapters: Vec<Record<Chapter>>,
    /// Key metrics.
    #[serde(default)]
    pub metrics: Vec<Record<MetricMoment>>,
    /// Speaker changes.
    #[serde(default)]
    pub speakers: Vec<Record<SpeakerMoment>>,
    /// Watermark overrides.
    #[serde(default)]
    pub logo: Option<LogoPlacement>,
    /// Closing call-to-action; no closing card without it.
    #[serde(default, alias = "callToAction")]
    pub call_to_action: Option<CallToActionDef>,
}

impl InsightData {
    /// Parse an insight document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OverlayError::serde(format!("parse insight JSON: {e}")))
    }

    /// Parse an insight document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open insight data '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, Deserialize)]
#[serde(default)]
/// Window lengths used by [`compile_insights`], in seconds.
pub struct InsightOptions {
    /// Opening title card length; base media and watermark start here.
    pub intro_secs: f64,
    /// Default metric call-out length.
    pub metric_secs: f64,
    /// Default speaker label length.
    pub speaker_secs: f64,
    /// Closing call-to-action length; base media ends where it starts.
    pub outro_secs: f64,
    /// Show a title card for every chapter.
    pub chapter_cards: bool,
    /// Chapter title card length.
    pub chapter_secs: f64,
}

impl Default for InsightOptions {
    fn default() -> Self {
        Self {
            intro_secs: 5.0,
            metric_secs: 5.0,
            speaker_secs: 8.0,
            outro_secs: 10.0,
            chapter_cards: false,
            chapter_secs: 5.0,
        }
    }
}

impl InsightOptions {
    /// Reject negative or non-finite lengths.
    pub fn check(&self) -> OverlayResult<()> {
        for (field, v) in [
            ("intro_secs", self.intro_secs),
            ("metric_secs", self.metric_secs),
            ("speaker_secs", self.speaker_secs),
            ("outro_secs", self.outro_secs),
            ("chapter_secs", self.chapter_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(OverlayError::validation(format!(
                    "{field} must be a finite, non-negative number of seconds, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Lay out an insight document as a timeline.
///
/// Insertion order (and therefore the stacking tie-break) is: opening title, chapter cards,
/// metrics, speakers, watermark, closing call-to-action. Items that fail to decode keep their
/// slot and show up in [`TimelineReport::rejected`].
#[tracing::instrument(skip(brand, insights, options))]
pub fn compile_insights(
    brand: impl Into<Arc<BrandProfile>>,
    insights: &InsightData,
    fps: Fps,
    options: &InsightOptions,
) -> OverlayResult<TimelineReport> {
    options.check()?;
    let brand = brand.into();
    let mut b =
        TimelineBuilder::with_duration_secs(fps, insights.duration_secs, Arc::clone(&brand))?;

    // to_frame caps totals at 2^53 frames.
    let total = b.total_frames() as i64;
    let intro = to_frame(options.intro_secs, fps)?.min(total);
    let outro = to_frame(options.outro_secs, fps)?.min(total);

    if let Some(source) = &insights.media_source {
        let duration_frames = total - intro - outro;
        if duration_frames > 0 {
            b = b.media(MediaSpec {
                source: source.clone(),
                window: WindowSpec::Frames {
                    start_frame: intro,
                    duration_frames,
                },
            });
        } else {
            tracing::warn!(
                total,
                intro,
                outro,
                "intro and outro cover the whole video; base media omitted"
            );
        }
    }

    let headline = insights
        .company
        .clone()
        .unwrap_or_else(|| brand.name().to_owned());
    if intro > 0 {
        b.push(OverlayEvent::at_frames(
            0,
            intro,
            OverlayKind::TitleCard(TitleCard {
                text: headline,
                quarter_label: insights.quarter.clone(),
                year: insights.year,
            }),
        ));
    }

    if options.chapter_cards {
        for (i, record) in insights.chapters.iter().enumerate() {
            match record {
                Record::Parsed(c) => b.push(OverlayEvent::at_secs(
                    c.timestamp,
                    options.chapter_secs,
                    OverlayKind::TitleCard(TitleCard {
                        text: c.title.clone(),
                        quarter_label: insights.quarter.clone(),
                        year: insights.year,
                    }),
                )),
                Record::Malformed(reason) => {
                    b.push_malformed("title_card", format!("chapter #{i}: {reason}"))
                }
            };
        }
    }

    for (i, record) in insights.metrics.iter().enumerate() {
        match record {
            Record::Parsed(m) => b.push(OverlayEvent::at_secs(
                m.timestamp,
                m.duration.unwrap_or(options.metric_secs),
                OverlayKind::MetricOverlay(MetricOverlay {
                    metric_name: m.metric.clone(),
                    value: m.value.clone(),
                    change_label: m.change.clone(),
                    change_sign: m.change_type,
                    screen_position: m.position,
                    animation_style: m.animation_style,
                }),
            )),
            Record::Malformed(reason) => {
                b.push_malformed("metric_overlay", format!("metric #{i}: {reason}"))
            }
        };
    }

    for (i, record) in insights.speakers.iter().enumerate() {
        match record {
            Record::Parsed(s) => b.push(OverlayEvent::at_secs(
                s.timestamp,
                s.duration.unwrap_or(options.speaker_secs),
                OverlayKind::SpeakerLabel(SpeakerLabel {
                    person_name: s.name.clone(),
                    person_title: s.title.clone(),
                    screen_position: s.position,
                    show_photo: s.show_photo,
                }),
            )),
            Record::Malformed(reason) => {
                b.push_malformed("speaker_label", format!("speaker #{i}: {reason}"))
            }
        };
    }

    if brand.logo_url().is_some() && total > intro {
        let placement = insights.logo.clone().unwrap_or_default();
        b.push(OverlayEvent::at_frames(
            intro,
            total - intro,
            OverlayKind::LogoWatermark(LogoWatermark {
                screen_position: placement.position,
                size_class: placement.size,
                opacity: placement.opacity,
            }),
        ));
    } else if brand.logo_url().is_some() {
        tracing::debug!(total, intro, "intro covers the whole video; watermark omitted");
    } else {
        tracing::debug!(brand = brand.name(), "brand has no logo; watermark omitted");
    }

    if let Some(cta) = &insights.call_to_action {
        if outro == 0 {
            tracing::debug!(outro, "outro is shorter than a frame; call-to-action omitted");
        } else {
            b.push(OverlayEvent::at_frames(
                total - outro,
                outro,
                OverlayKind::CallToAction(CallToAction {
                    message: cta.message.clone(),
                    url: cta.url.clone(),
                    show_subscribe: cta.show_subscribe,
                }),
            ));
        }
    }

    b.build()
}

#[cfg(test)]
#[path = "../../tests/unit/composition/insights.rs"]
mod tests;
