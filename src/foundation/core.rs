use crate::foundation::error::{OverlayError, OverlayResult};

/// Largest magnitude (in frames) accepted from floating-point timestamps.
///
/// Beyond 2^53 an `f64` can no longer represent every integer frame.
const MAX_EXACT_FRAMES: f64 = 9_007_199_254_740_992.0;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// A 0-based frame index within a timeline.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open frame range `[start, end)`.
pub struct FrameRange {
    /// Inclusive start frame.
    pub start: FrameIndex,
    /// Exclusive end frame.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> OverlayResult<Self> {
        if start.0 > end.0 {
            return Err(OverlayError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames covered by the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Whether the range covers no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Whether `f` lies inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
/// Integral, strictly positive frame rate (frames per second).
pub struct Fps(u32);

impl Fps {
    /// Build a frame rate; zero is rejected.
    pub fn new(fps: u32) -> OverlayResult<Self> {
        if fps == 0 {
            return Err(OverlayError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Frames per second as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<u32> for Fps {
    type Error = OverlayError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}fps", self.0)
    }
}

/// Convert wall-clock seconds to the nearest frame (round half up).
///
/// Negative inputs are allowed: authored timestamps may precede the timeline and are clipped
/// later. Non-finite values and values beyond exact `f64` integer precision are rejected.
pub fn to_frame(seconds: f64, fps: Fps) -> OverlayResult<i64> {
    if !seconds.is_finite() {
        return Err(OverlayError::validation(format!(
            "timestamp {seconds} is not a finite number of seconds"
        )));
    }
    let exact = seconds * fps.as_f64();
    let floor = exact.floor();
    // Compare the fractional part instead of adding 0.5, which rounds up just below a tie.
    let frames = if exact - floor >= 0.5 { floor + 1.0 } else { floor };
    if frames.abs() > MAX_EXACT_FRAMES {
        return Err(OverlayError::validation(format!(
            "timestamp {seconds}s is outside the representable frame range"
        )));
    }
    Ok(frames as i64)
}

/// Convert a frame index back to seconds.
///
/// Inverse of [`to_frame`] up to rounding; non-integral second inputs do not round-trip
/// bit-exactly.
pub fn to_seconds(frame: i64, fps: Fps) -> f64 {
    (frame as f64) / fps.as_f64()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// A clipped, non-empty window of frames `[start_frame, start_frame + duration_frames)`.
pub struct TimeWindow {
    /// First frame the window covers.
    pub start_frame: u64,
    /// Number of frames covered; always > 0.
    pub duration_frames: u64,
}

impl TimeWindow {
    /// Build a window; a zero duration is rejected.
    pub fn new(start_frame: u64, duration_frames: u64) -> OverlayResult<Self> {
        if duration_frames == 0 {
            return Err(OverlayError::validation("window duration must be > 0 frames"));
        }
        start_frame.checked_add(duration_frames).ok_or_else(|| {
            OverlayError::validation("window end overflows the frame index range")
        })?;
        Ok(Self {
            start_frame,
            duration_frames,
        })
    }

    /// Exclusive end frame.
    pub fn end_frame(self) -> u64 {
        self.start_frame + self.duration_frames
    }

    /// The window as a [`FrameRange`].
    pub fn range(self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start_frame),
            end: FrameIndex(self.end_frame()),
        }
    }

    /// Whether `frame` lies inside the window.
    pub fn contains(self, frame: FrameIndex) -> bool {
        self.start_frame <= frame.0 && frame.0 < self.end_frame()
    }

    /// Frames elapsed since the window started, if `frame` is inside it.
    pub fn local_frame(self, frame: FrameIndex) -> Option<u64> {
        self.contains(frame).then(|| frame.0 - self.start_frame)
    }

    /// `elapsed / duration` in `[0, 1)`, if `frame` is inside the window.
    pub fn progress(self, frame: FrameIndex) -> Option<f64> {
        self.local_frame(frame)
            .map(|local| (local as f64) / (self.duration_frames as f64))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
