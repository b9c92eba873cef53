//! Closest-approach kernel.
//!
//! Given two bodies moving linearly from a shared reference time, computes
//! the minimum separation over a bounded duration and classifies it.

use crate::models::{Sample, Status};
use crate::vector::Vec2;
use crate::{EPSILON, RED_THRESHOLD, YELLOW_THRESHOLD};

/// Minimum Euclidean distance between two bodies over `[0, duration]`.
///
/// Both samples must be projected to the same reference time. The squared
/// separation is quadratic in time with its minimum at
/// `t* = -(dp . dv) / |dv|^2`; the candidates are t = 0, t = duration, and
/// t* when it falls strictly inside the interval. A near-zero relative
/// velocity means the separation is constant.
pub fn min_distance(s1: &Sample, s2: &Sample, duration: f64) -> f64 {
    let rel_pos = s1.position.sub(s2.position);
    let rel_vel = s1.velocity.sub(s2.velocity);

    let rel_speed_sq = rel_vel.magnitude_squared();
    if rel_speed_sq < EPSILON {
        return rel_pos.magnitude();
    }

    let t_min = -rel_pos.dot(rel_vel) / rel_speed_sq;

    let mut min_sq = rel_pos
        .magnitude_squared()
        .min(separation_squared(s1, s2, duration));
    if t_min > 0.0 && t_min < duration {
        min_sq = min_sq.min(separation_squared(s1, s2, t_min));
    }

    // Floating point loss can push a touching pair fractionally negative.
    min_sq.max(0.0).sqrt()
}

fn separation_squared(s1: &Sample, s2: &Sample, at: f64) -> f64 {
    let p1 = s1.position.add(s1.velocity.scale(at));
    let p2 = s2.position.add(s2.velocity.scale(at));
    p1.sub(p2).magnitude_squared()
}

/// Classify a closest-approach distance.
pub fn status_for_distance(distance: f64) -> Status {
    if distance < RED_THRESHOLD {
        return Status::Red;
    }
    if distance < YELLOW_THRESHOLD {
        return Status::Yellow;
    }
    Status::Green
}
