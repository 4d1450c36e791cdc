//! Half-open interval helpers.
//!
//! Intervals are `(start, end)` pairs interpreted as `[start, end)`.
//! Touching endpoints never overlap, but they do merge.

/// A half-open `[start, end)` span in seconds.
pub type Interval = (f64, f64);

/// True iff `[a_start, a_end)` and `[b_start, b_end)` intersect.
pub fn overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Sort by start and fold overlapping or touching spans together.
///
/// Empty and inverted spans are dropped.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals
        .iter()
        .copied()
        .filter(|(start, end)| end > start)
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// The parts of `span` not covered by any of `covered`, ascending.
pub fn subtract(span: Interval, covered: &[Interval]) -> Vec<Interval> {
    let (span_start, span_end) = span;
    if span_end <= span_start {
        return vec![];
    }

    let clipped: Vec<Interval> = covered
        .iter()
        .filter(|(start, end)| overlaps(span_start, span_end, *start, *end))
        .map(|(start, end)| (start.max(span_start), end.min(span_end)))
        .collect();

    let mut visible = Vec::new();
    let mut cursor = span_start;
    for (start, end) in merge(&clipped) {
        if start > cursor {
            visible.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < span_end {
        visible.push((cursor, span_end));
    }
    visible
}

/// Total length covered by a set of disjoint intervals.
pub fn total_length(intervals: &[Interval]) -> f64 {
    intervals.iter().map(|(start, end)| end - start).sum()
}
