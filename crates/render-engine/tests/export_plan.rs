use cutline_render::{build_export_plan, ExportPlan, PlanOptions, Segment};
use cutline_timeline::{ClipSpec, Timeline, TimelineSettings, TrackId, TrackKind, TrimSide};
use proptest::prelude::*;

fn assert_contiguous(plan: &ExportPlan) {
    let mut cursor = 0.0;
    for segment in &plan.segments {
        assert!(
            (segment.start() - cursor).abs() < 1e-6,
            "segment at {} does not continue from {cursor}",
            segment.start()
        );
        assert!(segment.duration() > 0.0);
        cursor += segment.duration();
    }
    assert!((cursor - plan.duration).abs() < 1e-6);
}

fn no_black_pairs(plan: &ExportPlan) -> bool {
    plan.segments
        .windows(2)
        .all(|pair| !(pair[0].is_black() && pair[1].is_black()))
}

#[test]
fn layered_timeline_plans_top_down() {
    let mut timeline = Timeline::empty();
    let overlay = timeline.add_track(TrackKind::Video);
    let main = timeline.add_track(TrackKind::Video);
    let music = timeline.add_track(TrackKind::Audio);

    timeline
        .add_clip_at(overlay, ClipSpec::new("logo", "logo.mp4", 3.0), 2.0)
        .unwrap();
    let main_clip = timeline
        .add_clip(main, ClipSpec::new("main", "main.mp4", 12.0))
        .unwrap();
    timeline
        .trim(main, main_clip, TrimSide::Start, 1.0)
        .expect("trim leaves room");
    timeline
        .add_clip(music, ClipSpec::new("bed", "bed.mp3", 12.0))
        .unwrap();

    let plan = build_export_plan(&timeline, PlanOptions::default());
    assert_contiguous(&plan);

    let shape: Vec<(String, f64, f64)> = plan
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Black { start, duration } => ("black".to_string(), *start, *duration),
            Segment::Clip(clip) => (clip.source.clone(), clip.start, clip.trim_start),
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("black".to_string(), 0.0, 1.0),
            ("main.mp4".to_string(), 1.0, 1.0),
            ("logo.mp4".to_string(), 2.0, 0.0),
            ("main.mp4".to_string(), 5.0, 5.0),
        ]
    );
    assert_eq!(plan.mix.len(), 1);
    assert_eq!(plan.mix[0].delay, 0.0);
}

#[test]
fn replanning_is_byte_identical() {
    let mut timeline = Timeline::new();
    let video = timeline.tracks()[0].id;
    let audio = timeline.tracks()[1].id;
    timeline
        .add_clip_at(video, ClipSpec::new("a", "a.mp4", 3.0), 1.0)
        .unwrap();
    timeline
        .add_clip_at(audio, ClipSpec::new("m", "m.mp3", 5.0), 0.5)
        .unwrap();

    let first = build_export_plan(&timeline, PlanOptions::default())
        .to_json()
        .unwrap();
    let second = build_export_plan(&timeline.clone(), PlanOptions::default())
        .to_json()
        .unwrap();
    assert_eq!(first, second);
}

fn video_tracks(timeline: &mut Timeline, count: usize) -> Vec<TrackId> {
    (0..count)
        .map(|_| timeline.add_track(TrackKind::Video))
        .collect()
}

proptest! {
    #[test]
    fn segments_cover_the_whole_duration(
        placements in proptest::collection::vec((0usize..3, 0.0f64..30.0, 0.5f64..8.0, any::<bool>()), 0..16),
        floor in prop_oneof![Just(0.0f64), Just(10.0f64)],
    ) {
        let mut timeline = Timeline::empty_with_settings(TimelineSettings {
            display_floor_secs: floor,
            ..TimelineSettings::default()
        });
        let tracks = video_tracks(&mut timeline, 3);
        for (track, start, duration, has_source) in placements {
            let mut spec = ClipSpec::new("c", "c.mp4", duration);
            if !has_source {
                spec.source = None;
            }
            let _ = timeline.add_clip_at(tracks[track], spec, start);
        }

        let plan = build_export_plan(&timeline, PlanOptions::default());
        prop_assert!((plan.total_duration() - timeline.duration()).abs() < 1e-6);
        prop_assert!(no_black_pairs(&plan));
        assert_contiguous(&plan);

        for clip in plan.clip_segments() {
            prop_assert!((clip.trim_end - clip.trim_start - clip.duration).abs() < 1e-6);
        }
    }
}
