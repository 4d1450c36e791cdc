use cutline_processing::{clip_coverage, resolve_visible_sections, VisibleSection};
use cutline_timeline::{ClipSpec, Timeline, TrackKind};

fn sorted(mut sections: Vec<VisibleSection>) -> Vec<VisibleSection> {
    sections.sort_by(|a, b| {
        a.visible_start
            .total_cmp(&b.visible_start)
            .then(a.track_index.cmp(&b.track_index))
    });
    sections
}

/// Picture-in-picture overlay above a background clip, then a title card on
/// top of both.
fn three_layer_timeline() -> Timeline {
    let mut timeline = Timeline::empty();
    let title = timeline.add_track(TrackKind::Video);
    let overlay = timeline.add_track(TrackKind::Video);
    let background = timeline.add_track(TrackKind::Video);
    timeline.add_track(TrackKind::Audio);

    timeline
        .add_clip_at(title, ClipSpec::new("title", "title.png", 2.0), 0.0)
        .expect("title fits");
    timeline
        .add_clip_at(overlay, ClipSpec::new("pip", "pip.mp4", 4.0), 1.0)
        .expect("overlay fits");
    timeline
        .add_clip_at(background, ClipSpec::new("bg", "bg.mp4", 12.0), 0.0)
        .expect("background fits");
    timeline
}

#[test]
fn visible_sections_tile_the_timeline_without_overlap() {
    let timeline = three_layer_timeline();
    let sections = sorted(resolve_visible_sections(&timeline));

    let spans: Vec<(f64, f64, usize)> = sections
        .iter()
        .map(|s| (s.visible_start, s.visible_end, s.track_index))
        .collect();
    assert_eq!(
        spans,
        vec![(0.0, 2.0, 0), (2.0, 5.0, 1), (5.0, 12.0, 2)]
    );

    let overlay = &sections[1];
    assert_eq!((overlay.trim_start, overlay.trim_end), (1.0, 4.0));
    let background = &sections[2];
    assert_eq!((background.trim_start, background.trim_end), (5.0, 12.0));
}

#[test]
fn coverage_reports_merged_cover() {
    let timeline = three_layer_timeline();
    let (index, background) = timeline
        .clips()
        .find(|(index, _)| *index == 2)
        .expect("background clip present");

    let coverage = clip_coverage(&timeline, index, background);
    assert_eq!(coverage.covered, vec![(0.0, 5.0)]);
    assert_eq!(coverage.visible, vec![(5.0, 12.0)]);
}

#[test]
fn resolving_twice_is_identical() {
    let timeline = three_layer_timeline();
    let first = serde_json::to_string(&resolve_visible_sections(&timeline)).unwrap();
    let second = serde_json::to_string(&resolve_visible_sections(&timeline)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn reordering_tracks_changes_who_wins() {
    let mut timeline = three_layer_timeline();
    // Background to the top: it hides everything below for its whole span.
    timeline.reorder_tracks(2, 0).expect("indices in range");

    let sections = resolve_visible_sections(&timeline);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].span(), (0.0, 12.0));
    assert_eq!(sections[0].track_index, 0);
}
