use super::*;
use crate::brand::color::Color;
use crate::composition::event::LayerClass;
use crate::foundation::core::TimeWindow;
use serde_json::json;

fn brand(with_logo: bool) -> BrandProfile {
    let black = Color::from_hex("#000000").unwrap();
    let green = Color::from_hex("#00C805").unwrap();
    let b = BrandProfile::new("Robinhood", black, green).unwrap();
    if with_logo { b.with_logo_url("hood.svg") } else { b }
}

fn insights() -> InsightData {
    serde_json::from_value(json!({
        "quarter": "Q3",
        "year": 2025,
        "duration_secs": 60.0,
        "media_source": "audio/HOOD_Q3_2025.mp4",
        "chapters": [
            { "timestamp": 0, "title": "Opening Remarks", "description": "CEO begins." },
            { "timestamp": 30, "title": "Q&A" }
        ],
        "metrics": [
            { "timestamp": 12, "metric": "Revenue", "value": "$1.3B", "change": "+100% YoY",
              "changeType": "positive", "position": "center", "animationStyle": "bounce" },
            { "timestamp": 20, "metric": "Broken" },
            { "timestamp": 25, "metric": "Net Deposits", "value": "$20B", "duration": 2.5 }
        ],
        "speakers": [
            { "timestamp": 10, "name": "Vlad Tenev", "title": "CEO" }
        ],
        "callToAction": {
            "message": "View full interactive analysis",
            "url": "EarningLens.com/HOOD/Q3-2025",
            "showSubscribe": true
        }
    }))
    .unwrap()
}

fn fps30() -> Fps {
    Fps::new(30).unwrap()
}

fn window_of(report: &TimelineReport, index: usize) -> TimeWindow {
    report.timeline.event(index).unwrap().window
}

#[test]
fn malformed_records_are_kept_as_slots() {
    let data = insights();
    assert_eq!(data.metrics.len(), 3);
    assert!(matches!(data.metrics[0], Record::Parsed(_)));
    let Record::Malformed(reason) = &data.metrics[1] else {
        panic!("expected malformed record");
    };
    assert!(reason.contains("value"));
    let Record::Parsed(m) = &data.metrics[0] else {
        unreachable!()
    };
    assert_eq!(m.change_type, ChangeSign::Positive);
}

#[test]
fn lays_out_the_production_structure() {
    let report = compile_insights(brand(true), &insights(), fps30(), &InsightOptions::default())
        .unwrap();
    let t = &report.timeline;
    assert_eq!(t.total_frames(), 1800);

    // title, 3 metric slots, 1 speaker, watermark, cta
    let title = t.event(0).unwrap();
    assert!(matches!(&title.payload, OverlayKind::TitleCard(c) if c.text == "Robinhood" && c.year == 2025));
    assert_eq!(title.window, TimeWindow { start_frame: 0, duration_frames: 150 });

    assert_eq!(window_of(&report, 1), TimeWindow { start_frame: 360, duration_frames: 150 });
    assert_eq!(window_of(&report, 3), TimeWindow { start_frame: 750, duration_frames: 75 });
    assert_eq!(window_of(&report, 4), TimeWindow { start_frame: 300, duration_frames: 240 });

    let logo = t.event(5).unwrap();
    assert_eq!(logo.layer_class(), LayerClass::Watermark);
    assert_eq!(logo.window, TimeWindow { start_frame: 150, duration_frames: 1650 });
    let OverlayKind::LogoWatermark(w) = &logo.payload else {
        panic!("expected watermark");
    };
    assert_eq!(w.opacity, 0.8);
    assert_eq!(w.screen_position, ScreenPosition::TopLeft);

    let cta = t.event(6).unwrap();
    assert_eq!(cta.layer_class(), LayerClass::Terminal);
    assert_eq!(cta.window, TimeWindow { start_frame: 1500, duration_frames: 300 });

    let media = t.media().unwrap();
    assert_eq!(media.source, "audio/HOOD_Q3_2025.mp4");
    assert_eq!(media.window, TimeWindow { start_frame: 150, duration_frames: 1350 });

    assert!(report.dropped.is_empty());
    assert!(matches!(
        report.rejected.as_slice(),
        [OverlayError::InvalidEvent { index: 2, .. }]
    ));
}

#[test]
fn watermark_requires_a_logo() {
    let report = compile_insights(brand(false), &insights(), fps30(), &InsightOptions::default())
        .unwrap();
    assert!(
        report
            .timeline
            .events()
            .iter()
            .all(|e| e.layer_class() != LayerClass::Watermark)
    );
}

#[test]
fn chapter_cards_are_opt_in() {
    let options = InsightOptions {
        chapter_cards: true,
        chapter_secs: 3.0,
        ..InsightOptions::default()
    };
    let report = compile_insights(brand(true), &insights(), fps30(), &options).unwrap();
    let chapter = report.timeline.event(2).unwrap();
    assert!(matches!(&chapter.payload, OverlayKind::TitleCard(c) if c.text == "Q&A"));
    assert_eq!(chapter.window, TimeWindow { start_frame: 900, duration_frames: 90 });
}

#[test]
fn company_overrides_headline_and_events_past_the_end_are_dropped() {
    let mut data = insights();
    data.company = Some("Robinhood Markets".to_owned());
    data.speakers.push(Record::Parsed(SpeakerMoment {
        timestamp: 75.0,
        name: "Late".to_owned(),
        title: String::new(),
        position: ScreenPosition::BottomLeft,
        show_photo: false,
        duration: None,
    }));
    let report = compile_insights(brand(true), &data, fps30(), &InsightOptions::default()).unwrap();
    assert!(matches!(
        &report.timeline.event(0).unwrap().payload,
        OverlayKind::TitleCard(c) if c.text == "Robinhood Markets"
    ));
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].kind, "speaker_label");
}

#[test]
fn bad_options_and_durations_are_fatal() {
    let options = InsightOptions {
        outro_secs: -1.0,
        ..InsightOptions::default()
    };
    assert!(matches!(
        compile_insights(brand(true), &insights(), fps30(), &options),
        Err(OverlayError::Validation(_))
    ));

    let mut data = insights();
    data.duration_secs = 0.0;
    assert!(compile_insights(brand(true), &data, fps30(), &InsightOptions::default()).is_err());
}

#[test]
fn short_video_omits_media() {
    let mut data = insights();
    data.duration_secs = 12.0;
    let report = compile_insights(brand(true), &data, fps30(), &InsightOptions::default()).unwrap();
    assert!(report.timeline.media().is_none());
}

#[test]
fn reader_reports_serde_errors() {
    let err = InsightData::from_reader("{\"quarter\": \"Q3\"}".as_bytes()).unwrap_err();
    assert!(matches!(err, OverlayError::Serde(_)));
}

#[test]
fn zero_length_generated_overlays_are_omitted() {
    let mut data = insights();
    data.duration_secs = 5.0;
    data.metrics.clear();
    data.speakers.clear();
    let report = compile_insights(brand(true), &data, fps30(), &InsightOptions::default()).unwrap();
    assert!(report.rejected.is_empty(), "{:?}", report.rejected);
    assert!(
        report
            .timeline
            .events()
            .iter()
            .all(|e| e.layer_class() != LayerClass::Watermark)
    );

    let mut data = insights();
    data.metrics.clear();
    let options = InsightOptions {
        outro_secs: 0.0,
        ..InsightOptions::default()
    };
    let report = compile_insights(brand(true), &data, fps30(), &options).unwrap();
    assert!(report.rejected.is_empty(), "{:?}", report.rejected);
    assert!(
        report
            .timeline
            .events()
            .iter()
            .all(|e| e.layer_class() != LayerClass::Terminal)
    );
}
