//! # Overlay timeline guide
//!
//! A walkthrough of how a video's overlays are described, validated and resolved per frame.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Fps`](crate::Fps) and [`to_frame`](crate::to_frame): the time base. Every timestamp is
//!   converted to a frame index once, rounding half up, and all later logic is integral.
//! - [`BrandProfile`](crate::BrandProfile): name, palette and optional logo. Validated on load,
//!   shared by every event, never mutated.
//! - [`OverlayEvent`](crate::OverlayEvent): a [`WindowSpec`](crate::WindowSpec) plus an
//!   [`OverlayKind`](crate::OverlayKind) payload.
//! - [`Timeline`](crate::Timeline): the clipped events plus frame rate and total frame count.
//! - [`Resolver`](crate::Resolver): `(timeline, frame) -> ResolvedFrame`.
//! - [`CompositionDescriptor`](crate::CompositionDescriptor): what the encoder is told.
//!
//! ---
//!
//! ## Stacking
//!
//! Each payload maps to a [`LayerClass`](crate::LayerClass):
//!
//! | class | payloads |
//! |---|---|
//! | 0 `BaseMedia` | the media track (not an event) |
//! | 1 `Transient` | title card, metric, speaker label |
//! | 2 `Watermark` | logo watermark |
//! | 3 `Terminal` | call-to-action |
//!
//! Active layers are sorted by `(class, start_frame, insertion index)`. Overlapping events of the
//! same class are all drawn; nothing suppresses anything else.
//!
//! ---
//!
//! ## Clipping
//!
//! [`TimelineBuilder::build`](crate::TimelineBuilder::build) handles each event in turn:
//!
//! 1. payload checks (non-empty text, opacity in `[0, 1]`)
//! 2. seconds to frames
//! 3. a non-positive duration is rejected
//! 4. a start at or after `total_frames` is dropped with a
//!    [`DroppedEvent`](crate::DroppedEvent) advisory
//! 5. a negative start is moved to 0; if nothing is left the event is rejected
//! 6. the end is cut at `total_frames`
//!
//! Rejections are [`OverlayError::InvalidEvent`](crate::OverlayError::InvalidEvent) values in
//! [`TimelineReport::rejected`](crate::TimelineReport::rejected). The rest of the timeline is
//! still built. Clipping is idempotent: rebuilding from
//! [`Timeline::to_events`](crate::Timeline::to_events) gives the same timeline.
//!
//! ---
//!
//! ## Building from insight data
//!
//! ```no_run
//! use overlay_timeline::{BrandProfile, InsightData, RenderConfig, compile_insights};
//!
//! # fn main() -> overlay_timeline::OverlayResult<()> {
//! let brand = BrandProfile::from_path("brand.json")?;
//! let insights = InsightData::from_path("insights.json")?;
//! let config = RenderConfig::default();
//!
//! let report = compile_insights(brand, &insights, config.fps()?, &config.layout)?;
//! for advisory in &report.dropped {
//!     eprintln!("warning: {advisory}");
//! }
//! let timeline = report.into_timeline();
//! config.descriptor(timeline.total_frames())?.validate(&timeline)?;
//! # Ok(())
//! # }
//! ```
//!
//! The layout follows the production earnings videos: a title card for the first
//! `intro_secs`, base media from there until the last `outro_secs`, metrics and speaker labels at
//! their timestamps, the watermark from `intro_secs` to the end, and the call-to-action over the
//! last `outro_secs`.
//!
//! ---
//!
//! ## Resolving
//!
//! ```
//! use overlay_timeline::{
//!     BrandProfile, CallToAction, Color, Fps, OverlayEvent, OverlayKind, Resolver, Timeline,
//! };
//!
//! let black = Color::from_hex("#000000").unwrap();
//! let brand = BrandProfile::new("Acme", black, black).unwrap();
//! let cta = OverlayKind::CallToAction(CallToAction {
//!     message: "Thanks for watching".to_owned(),
//!     url: "example.com".to_owned(),
//!     show_subscribe: true,
//! });
//! let timeline = Timeline::builder(Fps::new(30).unwrap(), 900, brand)
//!     .event(OverlayEvent::at_secs(20.0, 10.0, cta))
//!     .build()
//!     .unwrap()
//!     .into_timeline();
//!
//! let frame = Resolver::resolve(&timeline, 750).unwrap();
//! assert_eq!(frame.layers.len(), 1);
//! assert_eq!(frame.layers[0].local_progress, 0.5);
//! assert!(Resolver::resolve(&timeline, 900).is_err());
//! ```
//!
//! Frames outside `[0, total_frames)` fail with
//! [`OverlayError::FrameOutOfBounds`](crate::OverlayError::FrameOutOfBounds) instead of being
//! clamped. [`resolve_range`](crate::resolve_range) resolves a span on a rayon pool when asked;
//! its output equals sequential resolution. [`cue_sheet`](crate::cue_sheet) summarizes the whole
//! timeline as spans with a constant layer stack.
