use super::*;
use crate::brand::color::Color;
use crate::composition::event::{CallToAction, LogoWatermark, MetricOverlay, ScreenPosition};

fn brand() -> BrandProfile {
    let black = Color::from_hex("#000000").unwrap();
    let green = Color::from_hex("#00c805").unwrap();
    BrandProfile::new("Acme", black, green).unwrap()
}

fn fps30() -> Fps {
    Fps::new(30).unwrap()
}

fn metric(name: &str) -> OverlayKind {
    OverlayKind::MetricOverlay(MetricOverlay {
        metric_name: name.to_owned(),
        value: "$1.3B".to_owned(),
        change_label: String::new(),
        change_sign: Default::default(),
        screen_position: ScreenPosition::Center,
        animation_style: Default::default(),
    })
}

fn cta() -> OverlayKind {
    OverlayKind::CallToAction(CallToAction {
        message: "Thanks for watching".to_owned(),
        url: "example.com".to_owned(),
        show_subscribe: true,
    })
}

#[test]
fn seconds_are_converted_to_frames() {
    let report = Timeline::builder(fps30(), 300, brand())
        .event(OverlayEvent::at_secs(2.0, 5.0, metric("Revenue")))
        .build()
        .unwrap();
    assert!(report.is_clean());
    let e = &report.timeline.events()[0];
    assert_eq!(e.index, 0);
    assert_eq!(e.window.start_frame, 60);
    assert_eq!(e.window.duration_frames, 150);
}

#[test]
fn event_past_the_end_is_dropped_with_advisory() {
    let report = TimelineBuilder::with_duration_secs(fps30(), 60.0, brand())
        .unwrap()
        .event(OverlayEvent::at_secs(10.0, 5.0, metric("Revenue")))
        .event(OverlayEvent::at_secs(61.0, 5.0, metric("Users")))
        .build()
        .unwrap();

    assert_eq!(report.timeline.total_frames(), 1800);
    assert_eq!(report.timeline.len(), 1);
    assert!(report.rejected.is_empty());
    assert_eq!(report.dropped.len(), 1);
    let d = &report.dropped[0];
    assert_eq!(d.index, 1);
    assert_eq!(d.kind, "metric_overlay");
    assert_eq!(d.start_frame, 1830);
    assert!(d.to_string().contains("dropped"));
}

#[test]
fn start_exactly_at_total_frames_is_dropped() {
    let report = Timeline::builder(fps30(), 90, brand())
        .event(OverlayEvent::at_frames(90, 10, cta()))
        .build()
        .unwrap();
    assert!(report.timeline.is_empty());
    assert_eq!(report.dropped.len(), 1);
}

#[test]
fn window_is_clipped_to_the_end() {
    let report = TimelineBuilder::with_duration_secs(fps30(), 2.0, brand())
        .unwrap()
        .event(OverlayEvent::at_secs(1.5, 2.0, cta()))
        .build()
        .unwrap();
    let w = report.timeline.events()[0].window;
    assert_eq!(w.start_frame, 45);
    assert_eq!(w.duration_frames, 15);
    assert_eq!(w.end_frame(), 60);
}

#[test]
fn negative_start_is_clipped_to_zero() {
    let report = Timeline::builder(fps30(), 100, brand())
        .event(OverlayEvent::at_frames(-30, 90, metric("Revenue")))
        .build()
        .unwrap();
    let w = report.timeline.events()[0].window;
    assert_eq!(w.start_frame, 0);
    assert_eq!(w.duration_frames, 60);
}

#[test]
fn invalid_events_are_rejected_without_failing_the_build() {
    let report = Timeline::builder(fps30(), 300, brand())
        .event(OverlayEvent::at_frames(0, 0, metric("Zero")))
        .event(OverlayEvent::at_frames(-50, 20, metric("Before")))
        .event(OverlayEvent::at_frames(10, 20, metric(" ")))
        .event(OverlayEvent::at_secs(f64::NAN, 1.0, metric("Nan")))
        .event(OverlayEvent::at_frames(5, 5, metric("Kept")))
        .build()
        .unwrap();

    assert_eq!(report.timeline.len(), 1);
    assert_eq!(report.timeline.events()[0].index, 4);
    let indices: Vec<usize> = report
        .rejected
        .iter()
        .map(|e| match e {
            OverlayError::InvalidEvent { index, .. } => *index,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert!(report.rejected.iter().all(|e| !e.is_fatal()));
}

#[test]
fn malformed_slots_keep_insertion_indices_stable() {
    let mut b = Timeline::builder(fps30(), 300, brand());
    assert_eq!(b.push(OverlayEvent::at_frames(0, 10, metric("A"))), 0);
    assert_eq!(b.push_malformed("metric_overlay", "missing value"), 1);
    assert_eq!(b.push(OverlayEvent::at_frames(0, 10, metric("B"))), 2);
    assert_eq!(b.len(), 3);

    let report = b.build().unwrap();
    let kept: Vec<usize> = report.timeline.events().iter().map(|e| e.index).collect();
    assert_eq!(kept, vec![0, 2]);
    assert!(matches!(
        report.rejected.as_slice(),
        [OverlayError::InvalidEvent { index: 1, .. }]
    ));
    assert!(report.timeline.event(2).is_some());
    assert!(report.timeline.event(1).is_none());
}

#[test]
fn overlapping_events_are_all_kept() {
    let report = Timeline::builder(fps30(), 300, brand())
        .event(OverlayEvent::at_frames(0, 100, metric("Revenue")))
        .event(OverlayEvent::at_frames(0, 100, metric("Revenue")))
        .event(OverlayEvent::at_frames(50, 100, metric("Users")))
        .build()
        .unwrap();
    assert_eq!(report.timeline.len(), 3);
}

#[test]
fn zero_length_timeline_is_fatal() {
    let err = Timeline::builder(fps30(), 0, brand()).build().unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
    assert!(err.is_fatal());

    assert!(TimelineBuilder::with_duration_secs(fps30(), 0.01, brand()).is_err());
}

#[test]
fn media_window_is_clipped_and_validated() {
    let report = Timeline::builder(fps30(), 300, brand())
        .media(MediaSpec {
            source: "call.mp4".to_owned(),
            window: WindowSpec::Seconds {
                start_secs: 5.0,
                duration_secs: 60.0,
            },
        })
        .build()
        .unwrap();
    let m = report.timeline.media().unwrap();
    assert_eq!(m.source, "call.mp4");
    assert_eq!(m.window.start_frame, 150);
    assert_eq!(m.window.duration_frames, 150);

    let err = Timeline::builder(fps30(), 300, brand())
        .media(MediaSpec {
            source: "call.mp4".to_owned(),
            window: WindowSpec::Frames {
                start_frame: 0,
                duration_frames: 0,
            },
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));

    let err = Timeline::builder(fps30(), 300, brand())
        .media(MediaSpec {
            source: " ".to_owned(),
            window: WindowSpec::Frames {
                start_frame: 0,
                duration_frames: 10,
            },
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
}

#[test]
fn rebuilding_from_clipped_events_is_idempotent() {
    let logo = OverlayKind::LogoWatermark(LogoWatermark {
        screen_position: ScreenPosition::TopLeft,
        size_class: Default::default(),
        opacity: 0.8,
    });
    let first = Timeline::builder(fps30(), 120, brand())
        .event(OverlayEvent::at_frames(-10, 40, metric("Revenue")))
        .event(OverlayEvent::at_frames(100, 500, cta()))
        .event(OverlayEvent::at_secs(0.0, 10.0, logo))
        .build()
        .unwrap()
        .into_timeline();

    let second = Timeline::builder(fps30(), 120, first.shared_brand())
        .events(first.to_events())
        .build()
        .unwrap();
    assert!(second.is_clean());
    assert_eq!(second.timeline, first);
}

#[test]
fn timeline_accessors() {
    let t = Timeline::builder(fps30(), 90, brand())
        .build()
        .unwrap()
        .into_timeline();
    assert_eq!(t.fps().get(), 30);
    assert_eq!(t.duration_secs(), 3.0);
    assert_eq!(t.range().len_frames(), 90);
    assert_eq!(t.brand().name(), "Acme");
    assert!(t.media().is_none());
    assert!(t.is_empty());
}
