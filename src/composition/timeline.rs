use std::sync::Arc;

use crate::{
    brand::profile::BrandProfile,
    composition::event::{LayerClass, OverlayEvent, OverlayKind, WindowSpec},
    foundation::core::{FrameIndex, FrameRange, Fps, TimeWindow, to_frame, to_seconds},
    foundation::error::{OverlayError, OverlayResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// An accepted overlay event with its clipped window.
pub struct TimelineEvent {
    /// Insertion index in the builder; the final tie-break for stacking.
    pub index: usize,
    /// Clipped window, always inside `[0, total_frames)`.
    pub window: TimeWindow,
    /// Kind-specific payload.
    pub payload: OverlayKind,
}

impl TimelineEvent {
    /// Stacking class of the payload.
    pub fn layer_class(&self) -> LayerClass {
        self.payload.layer_class()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Authored base media placement.
pub struct MediaSpec {
    /// Opaque media reference handed to the rasterizer.
    pub source: String,
    /// When the media track plays on the timeline.
    pub window: WindowSpec,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Clipped base media placement (layer class 0).
pub struct BaseMedia {
    /// Opaque media reference handed to the rasterizer.
    pub source: String,
    /// Clipped window on the timeline.
    pub window: TimeWindow,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Advisory: an event starting at or after the end of the timeline was skipped.
pub struct DroppedEvent {
    /// Insertion index of the dropped event.
    pub index: usize,
    /// Payload variant name.
    pub kind: &'static str,
    /// Start frame after conversion.
    pub start_frame: i64,
    /// Total frames of the timeline.
    pub total_frames: u64,
}

impl std::fmt::Display for DroppedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event #{} ({}) starts at frame {}, past the last frame of a {}-frame timeline; dropped",
            self.index, self.kind, self.start_frame, self.total_frames
        )
    }
}

/// Validated, clipped set of overlay events for one video.
///
/// Frame rate, total frame count, brand and events are fixed at construction; a timeline is
/// read-only for its whole lifetime and can be shared freely across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    fps: Fps,
    total_frames: u64,
    brand: Arc<BrandProfile>,
    media: Option<BaseMedia>,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Start building a timeline.
    pub fn builder(
        fps: Fps,
        total_frames: u64,
        brand: impl Into<Arc<BrandProfile>>,
    ) -> TimelineBuilder {
        TimelineBuilder::new(fps, total_frames, brand)
    }

    /// Frame rate the timeline was built with.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Total number of frames.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        to_seconds(self.total_frames as i64, self.fps)
    }

    /// `[0, total_frames)`.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Brand profile shared by every event.
    pub fn brand(&self) -> &BrandProfile {
        &self.brand
    }

    /// Another handle to the shared brand profile.
    pub fn shared_brand(&self) -> Arc<BrandProfile> {
        Arc::clone(&self.brand)
    }

    /// Base media placement, if any.
    pub fn media(&self) -> Option<&BaseMedia> {
        self.media.as_ref()
    }

    /// Accepted events in insertion order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Number of accepted events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event was accepted.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Look up an accepted event by its insertion index.
    pub fn event(&self, index: usize) -> Option<&TimelineEvent> {
        self.events
            .binary_search_by_key(&index, |e| e.index)
            .ok()
            .map(|i| &self.events[i])
    }

    /// Re-author the accepted events with their clipped frame windows.
    pub fn to_events(&self) -> Vec<OverlayEvent> {
        self.events
            .iter()
            .map(|e| {
                OverlayEvent::at_frames(
                    e.window.start_frame as i64,
                    e.window.duration_frames as i64,
                    e.payload.clone(),
                )
            })
            .collect()
    }
}

/// Outcome of a successful build: the timeline plus non-fatal diagnostics.
#[derive(Debug)]
pub struct TimelineReport {
    /// The validated timeline.
    pub timeline: Timeline,
    /// Events skipped because they start at or after the last frame.
    pub dropped: Vec<DroppedEvent>,
    /// Per-event rejections ([`OverlayError::InvalidEvent`]).
    pub rejected: Vec<OverlayError>,
}

impl TimelineReport {
    /// Whether every authored event made it into the timeline.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.rejected.is_empty()
    }

    /// Discard the diagnostics.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Event(OverlayEvent),
    Malformed { kind: &'static str, reason: String },
}

/// Collects authored events and clips them into a [`Timeline`].
#[derive(Clone, Debug)]
pub struct TimelineBuilder {
    fps: Fps,
    total_frames: u64,
    brand: Arc<BrandProfile>,
    media: Option<MediaSpec>,
    entries: Vec<Entry>,
}

impl TimelineBuilder {
    /// Start a timeline of `total_frames` frames at `fps`.
    pub fn new(fps: Fps, total_frames: u64, brand: impl Into<Arc<BrandProfile>>) -> Self {
        Self {
            fps,
            total_frames,
            brand: brand.into(),
            media: None,
            entries: Vec::new(),
        }
    }

    /// Start a timeline whose length is given in seconds (rounded to the nearest frame).
    pub fn with_duration_secs(
        fps: Fps,
        duration_secs: f64,
        brand: impl Into<Arc<BrandProfile>>,
    ) -> OverlayResult<Self> {
        let frames = to_frame(duration_secs, fps)?;
        if frames <= 0 {
            return Err(OverlayError::validation(format!(
                "timeline duration {duration_secs}s is shorter than one frame at {fps}"
            )));
        }
        Ok(Self::new(fps, frames as u64, brand))
    }

    /// Place the base media track.
    pub fn media(mut self, spec: MediaSpec) -> Self {
        self.media = Some(spec);
        self
    }

    /// Append an event.
    pub fn event(mut self, event: OverlayEvent) -> Self {
        self.push(event);
        self
    }

    /// Append several events in order.
    pub fn events(mut self, events: impl IntoIterator<Item = OverlayEvent>) -> Self {
        for e in events {
            self.push(e);
        }
        self
    }

    /// Append an event, returning its insertion index.
    pub fn push(&mut self, event: OverlayEvent) -> usize {
        self.entries.push(Entry::Event(event));
        self.entries.len() - 1
    }

    /// Reserve an insertion slot for a record that could not be decoded.
    ///
    /// The slot is reported as [`OverlayError::InvalidEvent`] by [`Self::build`].
    pub(crate) fn push_malformed(&mut self, kind: &'static str, reason: impl Into<String>) -> usize {
        self.entries.push(Entry::Malformed {
            kind,
            reason: reason.into(),
        });
        self.entries.len() - 1
    }

    /// Total frames the timeline will span.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frame rate the timeline will use.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Number of insertion slots used so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was added yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert, validate and clip every event.
    ///
    /// Fatal problems (zero length, unusable media window) abort the build. Individual events
    /// that are malformed or collapse to an empty window are reported in
    /// [`TimelineReport::rejected`]; events starting at or after the last frame are reported in
    /// [`TimelineReport::dropped`]. Overlapping events are all kept.
    #[tracing::instrument(
        skip(self),
        fields(fps = self.fps.get(), total_frames = self.total_frames, entries = self.entries.len())
    )]
    pub fn build(self) -> OverlayResult<TimelineReport> {
        if self.total_frames == 0 {
            return Err(OverlayError::validation("timeline total_frames must be > 0"));
        }
        if i64::try_from(self.total_frames).is_err() {
            return Err(OverlayError::validation(
                "timeline total_frames exceeds the signed frame range",
            ));
        }

        let media = match self.media {
            None => None,
            Some(spec) => clip_media(spec, self.fps, self.total_frames)?,
        };

        let mut events = Vec::with_capacity(self.entries.len());
        let mut dropped = Vec::new();
        let mut rejected = Vec::new();

        for (index, entry) in self.entries.into_iter().enumerate() {
            let event = match entry {
                Entry::Event(e) => e,
                Entry::Malformed { kind, reason } => {
                    tracing::warn!(index, kind, %reason, "rejected malformed event");
                    rejected.push(OverlayError::event(index, reason));
                    continue;
                }
            };
            let kind = event.payload.name();

            if let Err(reason) = event.payload.validate() {
                tracing::warn!(index, kind, %reason, "rejected event payload");
                rejected.push(OverlayError::event(index, reason));
                continue;
            }

            match clip_window(event.window, self.fps, self.total_frames) {
                Clipped::Kept(window) => events.push(TimelineEvent {
                    index,
                    window,
                    payload: event.payload,
                }),
                Clipped::Dropped { start_frame } => {
                    let advisory = DroppedEvent {
                        index,
                        kind,
                        start_frame,
                        total_frames: self.total_frames,
                    };
                    tracing::warn!(%advisory, "dropped event");
                    dropped.push(advisory);
                }
                Clipped::Invalid(reason) => {
                    tracing::warn!(index, kind, %reason, "rejected event window");
                    rejected.push(OverlayError::event(index, reason));
                }
            }
        }

        tracing::debug!(
            accepted = events.len(),
            dropped = dropped.len(),
            rejected = rejected.len(),
            "timeline built"
        );

        Ok(TimelineReport {
            timeline: Timeline {
                fps: self.fps,
                total_frames: self.total_frames,
                brand: self.brand,
                media,
                events,
            },
            dropped,
            rejected,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Clipped {
    Kept(TimeWindow),
    Dropped { start_frame: i64 },
    Invalid(String),
}

fn clip_media(spec: MediaSpec, fps: Fps, total_frames: u64) -> OverlayResult<Option<BaseMedia>> {
    if spec.source.trim().is_empty() {
        return Err(OverlayError::validation("base media source must be non-empty"));
    }
    match clip_window(spec.window, fps, total_frames) {
        Clipped::Kept(window) => Ok(Some(BaseMedia {
            source: spec.source,
            window,
        })),
        Clipped::Dropped { start_frame } => {
            tracing::warn!(start_frame, "base media starts after the timeline ends; ignored");
            Ok(None)
        }
        Clipped::Invalid(reason) => Err(OverlayError::validation(format!(
            "base media window: {reason}"
        ))),
    }
}

/// Convert an authored window to frames and clip it against `[0, total_frames)`.
fn clip_window(spec: WindowSpec, fps: Fps, total_frames: u64) -> Clipped {
    let (start, duration) = match spec {
        WindowSpec::Frames {
            start_frame,
            duration_frames,
        } => (start_frame, duration_frames),
        WindowSpec::Seconds {
            start_secs,
            duration_secs,
        } => match (to_frame(start_secs, fps), to_frame(duration_secs, fps)) {
            (Ok(s), Ok(d)) => (s, d),
            (Err(e), _) | (_, Err(e)) => return Clipped::Invalid(e.to_string()),
        },
    };

    if duration <= 0 {
        return Clipped::Invalid(format!("duration must be > 0 frames, got {duration}"));
    }

    let total = i64::try_from(total_frames).unwrap_or(i64::MAX);
    if start >= total {
        return Clipped::Dropped { start_frame: start };
    }

    let end = start.saturating_add(duration);
    let clipped_start = start.max(0);
    let clipped_end = end.min(total);
    if clipped_end <= clipped_start {
        return Clipped::Invalid(format!(
            "window [{start}, {end}) lies entirely before frame 0"
        ));
    }

    Clipped::Kept(TimeWindow {
        start_frame: clipped_start as u64,
        duration_frames: (clipped_end - clipped_start) as u64,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/composition/timeline.rs"]
mod tests;
