//! Shipping-lane scenarios for fleet simulation.

/// Trait for ship course implementations.
pub trait Course {
    /// Integer grid position at `t` seconds from the start.
    fn position(&self, t: i64) -> (i64, i64);
}

/// A straight shipping lane travelled at constant speed.
pub struct LaneCourse {
    pub start_x: i64,
    pub start_y: i64,
    /// Units per second along x.
    pub speed_x: i64,
    /// Units per second along y.
    pub speed_y: i64,
}

impl LaneCourse {
    pub fn new(start_x: i64, start_y: i64, speed_x: i64, speed_y: i64) -> Self {
        Self {
            start_x,
            start_y,
            speed_x,
            speed_y,
        }
    }
}

impl Course for LaneCourse {
    fn position(&self, t: i64) -> (i64, i64) {
        (self.start_x + self.speed_x * t, self.start_y + self.speed_y * t)
    }
}

/// Build a fleet of eastbound lanes stacked along y, starting at
/// `(origin_x, origin_y)` and separated by `spacing` units.
pub fn parallel_lanes(count: usize, origin_x: i64, origin_y: i64, spacing: i64) -> Vec<LaneCourse> {
    (0..count)
        .map(|i| LaneCourse::new(origin_x, origin_y + spacing * i as i64, 5, 0))
        .collect()
}
