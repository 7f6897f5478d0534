/// Convenience result type used across the crate.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Brand input is malformed or missing a required color.
    #[error("invalid brand profile: {0}")]
    InvalidBrandProfile(String),

    /// A single overlay event was rejected; timeline construction continues without it.
    #[error("invalid event #{index}: {reason}")]
    InvalidEvent {
        /// Insertion index of the offending event.
        index: usize,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// Descriptor frame rate differs from the timeline frame rate.
    #[error("mismatched frame rate: descriptor {descriptor} fps, timeline {timeline} fps")]
    MismatchedFrameRate {
        /// Frame rate declared by the composition descriptor.
        descriptor: u32,
        /// Frame rate the timeline was built with.
        timeline: u32,
    },

    /// Descriptor duration differs from the timeline duration.
    #[error("mismatched duration: descriptor {descriptor} frames, timeline {timeline} frames")]
    MismatchedDuration {
        /// Total frames declared by the composition descriptor.
        descriptor: u64,
        /// Total frames of the timeline.
        timeline: u64,
    },

    /// Frame index outside `[0, total_frames)`.
    #[error("frame {frame} is out of bounds (total frames {total_frames})")]
    FrameOutOfBounds {
        /// Requested frame index.
        frame: i64,
        /// Total frame count of the timeline.
        total_frames: u64,
    },

    /// Structurally invalid configuration or timeline parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::InvalidBrandProfile`] value.
    pub fn brand(msg: impl Into<String>) -> Self {
        Self::InvalidBrandProfile(msg.into())
    }

    /// Build an [`OverlayError::InvalidEvent`] value.
    pub fn event(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            index,
            reason: reason.into(),
        }
    }

    /// Build an [`OverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts building or rendering as a whole.
    ///
    /// [`OverlayError::InvalidEvent`] and [`OverlayError::FrameOutOfBounds`] only affect a
    /// single event or a single call.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidEvent { .. } | Self::FrameOutOfBounds { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
