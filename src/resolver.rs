//! Active segment resolution: which segment is on screen at a given playback time.
//!
//! Two strategies share one contract (`start <= time < end`, first match in sequence order):
//! - `resolve_sorted*` binary-searches start times and is only correct for sorted,
//!   non-overlapping input.
//! - `resolve_linear*` scans front to back and is correct for any input.
//!
//! Proving a slice is well formed costs a full pass, so the plain `resolve` never does it: on an
//! unchecked slice it is the first-match scan, which stops as soon as it hits. For O(log n)
//! lookups use [`crate::Transcription::active_at`], which caches well-formedness on load and
//! edit, or call `resolve_sorted` on input you already know is sorted.

use crate::segments::Segment;

/// Find the segment active at `time` in an arbitrary, unchecked slice.
///
/// Returns `None` for gaps, times before the first or after the last segment, and NaN.
/// Overlapping or unsorted input resolves to the first match in sequence order.
pub fn resolve(segments: &[Segment], time: f64) -> Option<&Segment> {
    resolve_index(segments, time).map(|i| &segments[i])
}

pub fn resolve_index(segments: &[Segment], time: f64) -> Option<usize> {
    resolve_linear_index(segments, time)
}

/// O(log n) lookup. `segments` must be sorted by start and non-overlapping.
pub fn resolve_sorted(segments: &[Segment], time: f64) -> Option<&Segment> {
    resolve_sorted_index(segments, time).map(|i| &segments[i])
}

pub fn resolve_sorted_index(segments: &[Segment], time: f64) -> Option<usize> {
    if time.is_nan() {
        return None;
    }

    // Index of the first segment starting after `time`; the only candidate is the one before it.
    let after = segments.partition_point(|s| s.start_seconds <= time);
    after.checked_sub(1).filter(|&i| segments[i].contains(time))
}

/// O(n) lookup. Correct for unsorted or overlapping input; the first match wins.
pub fn resolve_linear(segments: &[Segment], time: f64) -> Option<&Segment> {
    resolve_linear_index(segments, time).map(|i| &segments[i])
}

pub fn resolve_linear_index(segments: &[Segment], time: f64) -> Option<usize> {
    segments.iter().position(|s| s.contains(time))
}
