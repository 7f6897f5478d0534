use crate::{
    composition::{
        event::{LayerClass, OverlayKind},
        timeline::{Timeline, TimelineEvent},
    },
    foundation::core::{FrameIndex, TimeWindow},
    foundation::error::{OverlayError, OverlayResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything visible at one frame, bottom to top.
pub struct ResolvedFrame {
    /// The queried frame.
    pub frame: FrameIndex,
    /// Base media sample, when the media track covers the frame.
    pub media: Option<ResolvedMedia>,
    /// Active overlays in draw order.
    pub layers: Vec<ResolvedLayer>,
}

impl ResolvedFrame {
    /// Whether nothing at all is visible.
    pub fn is_empty(&self) -> bool {
        self.media.is_none() && self.layers.is_empty()
    }

    /// Insertion indices of the active events, in draw order.
    pub fn event_indices(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.event_index).collect()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Base media position at a frame (layer class 0, z-order 0).
pub struct ResolvedMedia {
    /// Opaque media reference.
    pub source: String,
    /// Frames since the media window started.
    pub local_frame: u64,
    /// Seconds into the media source.
    pub source_time_secs: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One active overlay at a frame.
pub struct ResolvedLayer {
    /// Insertion index of the originating event.
    pub event_index: usize,
    /// Stacking class.
    pub layer_class: LayerClass,
    /// 1-based draw position; higher is drawn later.
    pub z_order: usize,
    /// Clipped window of the event.
    pub window: TimeWindow,
    /// Frames since the window started.
    pub local_frame: u64,
    /// `local_frame / duration_frames`, in `[0, 1)`.
    pub local_progress: f64,
    /// Payload of the originating event.
    pub payload: OverlayKind,
}

/// Stateless per-frame resolver.
pub struct Resolver;

impl Resolver {
    /// Resolve the overlays active at `frame`.
    ///
    /// Fails with [`OverlayError::FrameOutOfBounds`] when `frame < 0` or
    /// `frame >= total_frames`; out-of-range frames are never clamped.
    #[tracing::instrument(skip(timeline))]
    pub fn resolve(timeline: &Timeline, frame: i64) -> OverlayResult<ResolvedFrame> {
        let total_frames = timeline.total_frames();
        let f = u64::try_from(frame)
            .ok()
            .filter(|&f| f < total_frames)
            .ok_or(OverlayError::FrameOutOfBounds {
                frame,
                total_frames,
            })?;
        Ok(resolve_in_bounds(timeline, FrameIndex(f)))
    }

    /// [`Self::resolve`] for an unsigned frame index.
    pub fn resolve_index(timeline: &Timeline, frame: FrameIndex) -> OverlayResult<ResolvedFrame> {
        if frame.0 >= timeline.total_frames() {
            return Err(OverlayError::FrameOutOfBounds {
                frame: i64::try_from(frame.0).unwrap_or(i64::MAX),
                total_frames: timeline.total_frames(),
            });
        }
        Ok(resolve_in_bounds(timeline, frame))
    }
}

/// Ordered layers active at `frame`; see [`Resolver::resolve`].
pub fn resolve(timeline: &Timeline, frame: i64) -> OverlayResult<Vec<ResolvedLayer>> {
    Resolver::resolve(timeline, frame).map(|f| f.layers)
}

/// Active events at an in-range frame, sorted by `(layer class, start frame, insertion index)`.
pub(crate) fn active_events(timeline: &Timeline, frame: FrameIndex) -> Vec<(&TimelineEvent, u64)> {
    let mut with_key: Vec<((LayerClass, u64, usize), (&TimelineEvent, u64))> = timeline
        .events()
        .iter()
        .filter_map(|e| {
            let local = e.window.local_frame(frame)?;
            Some(((e.layer_class(), e.window.start_frame, e.index), (e, local)))
        })
        .collect();

    with_key.sort_by(|a, b| a.0.cmp(&b.0));
    with_key.into_iter().map(|(_, v)| v).collect()
}

pub(crate) fn resolve_in_bounds(timeline: &Timeline, frame: FrameIndex) -> ResolvedFrame {
    let media = timeline.media().and_then(|m| {
        let local_frame = m.window.local_frame(frame)?;
        Some(ResolvedMedia {
            source: m.source.clone(),
            local_frame,
            source_time_secs: (local_frame as f64) / timeline.fps().as_f64(),
        })
    });

    let layers = active_events(timeline, frame)
        .into_iter()
        .enumerate()
        .map(|(pos, (e, local_frame))| ResolvedLayer {
            event_index: e.index,
            layer_class: e.layer_class(),
            z_order: pos + 1,
            window: e.window,
            local_frame,
            local_progress: (local_frame as f64) / (e.window.duration_frames as f64),
            payload: e.payload.clone(),
        })
        .collect();

    ResolvedFrame {
        frame,
        media,
        layers,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/resolver.rs"]
mod tests;
