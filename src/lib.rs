//! Overlay timeline is a frame-exact scheduling engine for branded video overlays.
//!
//! It turns a brand profile plus timestamped insight data (title card, metric call-outs, speaker
//! labels, logo watermark, closing call-to-action) into a validated [`Timeline`], and answers
//! "what is visible at frame N, and in what order" with a pure resolver. Rasterizing and encoding
//! stay outside the crate.
//!
//! # Pipeline overview
//!
//! 1. **Load**: brand JSON -> [`BrandProfile`], insight JSON -> [`InsightData`]
//! 2. **Build**: [`compile_insights`] or [`TimelineBuilder`] -> [`Timeline`] (clipped, with
//!    advisories in [`TimelineReport`])
//! 3. **Check**: [`validate`] the encoder-facing [`CompositionDescriptor`] against the timeline
//! 4. **Resolve**: `Timeline + frame -> ResolvedFrame` via [`Resolver`], [`resolve`] or
//!    [`resolve_range`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure resolution**: resolving a frame depends only on the timeline and the frame index, so
//!   frames may be resolved in any order or in parallel.
//! - **Explicit stacking**: draw order comes from [`LayerClass`], then start frame, then insertion
//!   order; never from declaration position alone.
//!
//! See [`crate::guide`] for a walkthrough.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod brand;
mod compile;
mod composition;
mod eval;
mod foundation;

/// Walkthrough of the data model, clipping rules and resolver contract.
pub mod guide;

pub use brand::color::Color;
pub use brand::profile::BrandProfile;
pub use compile::cues::{Cue, cue_sheet};
pub use compile::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use composition::descriptor::{CompositionDescriptor, RenderConfig, validate};
pub use composition::event::{
    AnimationStyle, CallToAction, ChangeSign, LayerClass, LogoWatermark, MetricOverlay,
    OverlayEvent, OverlayKind, ScreenPosition, SizeClass, SpeakerLabel, TitleCard, WindowSpec,
};
pub use composition::insights::{
    CallToActionDef, Chapter, InsightData, InsightOptions, LogoPlacement, MetricMoment, Record,
    SpeakerMoment, compile_insights,
};
pub use composition::timeline::{
    BaseMedia, DroppedEvent, MediaSpec, Timeline, TimelineBuilder, TimelineEvent, TimelineReport,
};
pub use eval::parallel::{ResolveThreading, resolve_range};
pub use eval::resolver::{ResolvedFrame, ResolvedLayer, ResolvedMedia, Resolver, resolve};
pub use foundation::core::{FrameIndex, FrameRange, Fps, TimeWindow, to_frame, to_seconds};
pub use foundation::error::{OverlayError, OverlayResult};
