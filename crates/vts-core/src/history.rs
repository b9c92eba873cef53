//! History alignment for peer trajectory projection.
//!
//! Peer ships report sporadically, so before closest-approach checks their
//! recorded samples must be projected onto the evaluation window
//! `[at, at + HORIZON_SECS]`: the slice of relevant samples is located by
//! binary search, each sample's velocity is recomputed from the next known
//! sample where one exists, and the first sample is shifted to sit exactly
//! at the window start.

use crate::models::Sample;
use crate::vector::Vec2;
use crate::HORIZON_SECS;

/// Align a ship's history onto the window starting at `at`.
///
/// Returns an empty vec when no recorded sample is relevant to the window.
/// When the latest recorded sample predates the window it is carried
/// forward along its velocity.
///
/// The recorded velocity at a sparse sample can badly mispredict the path
/// the ship actually took, so wherever a later sample is known the velocity
/// is replaced by the finite difference towards it. That repaired velocity
/// is deliberately not capped: the evaluator bounds each segment by the
/// next sample's time, and an accurate trajectory matters more than a
/// plausible magnitude.
pub fn rewind(history: &[Sample], at: i64) -> Vec<Sample> {
    if history.is_empty() {
        return Vec::new();
    }
    let window_end = at + HORIZON_SECS;

    // First sample at or after the window start, stepping back one when the
    // window opens between samples (or after the last one).
    let mut start = history.partition_point(|s| s.time < at);
    if start == history.len() {
        start -= 1;
    } else if start > 0 && history[start].time > at {
        start -= 1;
    }

    // First sample past the window end.
    let end = history.partition_point(|s| s.time <= window_end);
    if start >= end {
        return Vec::new();
    }

    let mut aligned = history[start..end].to_vec();

    // The repair span reaches one sample past the window when the window is
    // not already covered, so the last in-window sample gets a real
    // trajectory too.
    let mut span_end = end;
    if end != history.len() && history[end - 1].time < window_end {
        span_end = end + 1;
    }
    let span = &history[start..span_end];
    for i in 0..span.len().saturating_sub(1) {
        aligned[i].velocity = trajectory_velocity(&span[i], &span[i + 1]);
    }

    // Project the first sample onto the window start. The shift can move it
    // forward (stale peer) or backward (sample inside the window).
    let shift = (at - aligned[0].time) as f64;
    aligned[0].position = aligned[0].position.add(aligned[0].velocity.scale(shift));
    aligned[0].time = at;

    aligned
}

/// Velocity implied by two recorded samples. Unlike ingest-time derivation
/// this is not clamped to the speed cap.
fn trajectory_velocity(from: &Sample, to: &Sample) -> Vec2 {
    let delta_time = (to.time - from.time) as f64;
    to.position.sub(from.position).scale(1.0 / delta_time)
}
