//! The ship store and proximity evaluator.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use crate::approach::{min_distance, status_for_distance};
use crate::error::TrafficError;
use crate::history::rewind;
use crate::models::{Evaluation, Report, Sample, Ship, Status};
use crate::vector::Vec2;
use crate::{HORIZON_SECS, MAX_SPEED};

#[derive(Debug, Default)]
struct ShipRecord {
    history: Vec<Sample>,
    last_status: Status,
}

type ShipMap = HashMap<String, ShipRecord>;

/// Concurrency-safe store of every known ship, plus the ingest pipeline
/// that evaluates each new report against the rest of the fleet.
///
/// One readers-writer lock covers the id map and all histories. Ingest
/// holds the exclusive lock across read-last, evaluate, and append, so a
/// reader can never observe a history with its last sample in place but
/// the matching status missing, and two writers for the same ship cannot
/// interleave.
pub struct Traffic {
    inner: RwLock<ShipMap>,
}

impl Traffic {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every ship and its history.
    pub fn flush(&self) {
        let mut ships = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *ships = HashMap::new();
    }

    /// Last-known summary of every tracked ship. Enumeration order is
    /// unspecified.
    pub fn ships(&self) -> Vec<Ship> {
        let ships = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ships
            .iter()
            .filter_map(|(id, record)| {
                record.history.last().map(|last| Ship {
                    id: id.clone(),
                    last_time: last.time,
                    last_status: record.last_status,
                    last_speed: last.velocity.magnitude(),
                    last_position: last.position,
                })
            })
            .collect()
    }

    /// Full ordered history of one ship.
    pub fn ship_positions(&self, id: &str) -> Result<Vec<Sample>, TrafficError> {
        let ships = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ships
            .get(id)
            .map(|record| record.history.clone())
            .ok_or(TrafficError::NotFound)
    }

    /// Ingest one position report: validate its time, derive the ship's
    /// velocity, evaluate proximity against the fleet and the tower, and
    /// commit the sample. Nothing is mutated on failure.
    pub fn position_ship(&self, report: Report) -> Result<Evaluation, TrafficError> {
        if report.time > Utc::now().timestamp() {
            return Err(TrafficError::TimeInFuture);
        }

        let mut ships = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut velocity = Vec2::ZERO;
        if let Some(last) = ships.get(&report.id).and_then(|r| r.history.last()) {
            if report.time <= last.time {
                return Err(TrafficError::TimeInPast);
            }
            velocity = derive_velocity(
                (report.time - last.time) as f64,
                report.position,
                last.position,
            );
        }

        let status = evaluate(&ships, &report, velocity);

        let record = ships.entry(report.id).or_default();
        record
            .history
            .push(Sample::new(report.time, report.position, velocity));
        record.last_status = status;

        Ok(Evaluation {
            speed: velocity.magnitude(),
            status,
        })
    }
}

impl Default for Traffic {
    fn default() -> Self {
        Self::new()
    }
}

/// Velocity between two positions over `delta_time`, capped at the maximum
/// credible speed for a reporting ship.
fn derive_velocity(delta_time: f64, position: Vec2, last_position: Vec2) -> Vec2 {
    let velocity = position.sub(last_position).scale(1.0 / delta_time);
    if velocity.magnitude() > MAX_SPEED {
        return velocity.normalize().scale(MAX_SPEED);
    }
    velocity
}

/// Evaluate a report against every other ship and the tower.
///
/// Each peer's history is aligned onto the 60-second window and walked
/// segment by segment, because a peer's velocity changes at every recorded
/// sample: one long interval against its earliest velocity would mispredict
/// the path. The reporting ship is advanced to each segment's start so both
/// bodies share a reference time before the kernel runs. Red aborts all
/// remaining work.
fn evaluate(ships: &ShipMap, report: &Report, velocity: Vec2) -> Status {
    let mut status = Status::Green;
    let window_end = report.time + HORIZON_SECS;

    'fleet: for (id, record) in ships {
        if id == &report.id {
            continue; // a ship cannot collide with itself
        }

        let segments = rewind(&record.history, report.time);

        let mut current_position = report.position;
        let mut current_time = report.time;
        for (i, segment) in segments.iter().enumerate() {
            let segment_end = match segments.get(i + 1) {
                Some(next) => next.time.min(window_end),
                None => window_end,
            };

            current_position =
                current_position.add(velocity.scale((segment.time - current_time) as f64));
            current_time = segment.time;

            let duration = (segment_end - current_time) as f64;
            if duration <= 0.0 {
                continue;
            }

            let own = Sample::new(current_time, current_position, velocity);
            let verdict = status_for_distance(min_distance(segment, &own, duration));
            if verdict == Status::Red {
                status = Status::Red;
                break 'fleet;
            }
            status = status.escalate(verdict);
        }
    }

    if status == Status::Red {
        return status;
    }

    status.escalate(tower_status(report, velocity))
}

/// Closest-approach verdict against the stationary hazard at the origin.
fn tower_status(report: &Report, velocity: Vec2) -> Status {
    let tower = Sample::new(report.time, Vec2::ZERO, Vec2::ZERO);
    let own = Sample::new(report.time, report.position, velocity);
    status_for_distance(min_distance(&tower, &own, HORIZON_SECS as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: i64, x: f64, y: f64, vx: f64, vy: f64) -> Sample {
        Sample::new(time, Vec2::new(x, y), Vec2::new(vx, vy))
    }

    fn report(id: &str, time: i64, x: f64, y: f64) -> Report {
        Report {
            id: id.to_string(),
            time,
            position: Vec2::new(x, y),
        }
    }

    fn fleet(entries: Vec<(&str, Vec<Sample>)>) -> ShipMap {
        entries
            .into_iter()
            .map(|(id, history)| {
                (
                    id.to_string(),
                    ShipRecord {
                        history,
                        last_status: Status::Green,
                    },
                )
            })
            .collect()
    }

    // Evaluator tests run in open water (around x,y = 1000) so the tower
    // term stays Green and only the geometry under test decides.

    #[test]
    fn no_other_ships_is_green() {
        let ships = fleet(vec![]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::new(1.0, 1.0));
        assert_eq!(status, Status::Green);
    }

    #[test]
    fn far_apart_is_green() {
        let ships = fleet(vec![("ship2", vec![sample(90, 1010.0, 1010.0, 0.0, 0.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Green);
    }

    #[test]
    fn within_caution_threshold_is_yellow() {
        let ships = fleet(vec![("ship2", vec![sample(100, 1001.5, 1000.0, 0.0, 0.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Yellow);
    }

    #[test]
    fn within_danger_threshold_is_red() {
        let ships = fleet(vec![("ship2", vec![sample(100, 1000.5, 1000.0, 0.0, 0.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn own_history_is_ignored() {
        let ships = fleet(vec![("ship1", vec![sample(90, 1000.0, 1000.0, 0.0, 0.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Green);
    }

    #[test]
    fn predicted_collision_is_red() {
        // Meet around x = 1005 after five seconds.
        let ships = fleet(vec![("ship2", vec![sample(100, 1010.0, 1000.0, -1.0, 0.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::new(1.0, 0.0));
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn red_wins_over_yellow_across_peers() {
        let ships = fleet(vec![
            ("ship2", vec![sample(100, 1001.5, 1000.0, 0.0, 0.0)]),
            ("ship3", vec![sample(100, 1000.5, 1000.0, 0.0, 0.0)]),
        ]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn peer_is_judged_where_it_is_now_not_where_it_was() {
        // Close at t=90, but ten units downrange by evaluation time.
        let ships = fleet(vec![(
            "ship2",
            vec![
                sample(90, 1000.5, 1000.0, 1.0, 0.0),
                sample(110, 1020.0, 1000.0, 1.0, 0.0),
                sample(140, 1050.0, 1000.0, 1.0, 0.0),
            ],
        )]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Green);
    }

    #[test]
    fn sample_at_window_edge_still_counts() {
        let ships = fleet(vec![(
            "ship2",
            vec![sample(100 + HORIZON_SECS, 1000.5, 1000.0, 0.0, 0.0)],
        )]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::ZERO);
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn converging_paths_are_red() {
        let ships = fleet(vec![("ship2", vec![sample(100, 1010.0, 1010.0, -1.0, -1.0)])]);
        let status = evaluate(&ships, &report("ship1", 100, 1000.0, 1000.0), Vec2::new(1.0, 1.0));
        assert_eq!(status, Status::Red);
    }

    // Tower behavior.

    #[test]
    fn parked_near_the_tower_is_yellow() {
        let ships = fleet(vec![]);
        let status = evaluate(&ships, &report("ship1", 123, 1.0, 1.0), Vec2::ZERO);
        assert_eq!(status, Status::Yellow);
    }

    #[test]
    fn parked_on_the_tower_is_red() {
        let ships = fleet(vec![]);
        let status = evaluate(&ships, &report("ship1", 123, 0.0, 0.0), Vec2::ZERO);
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn inbound_to_the_tower_is_red() {
        // Crosses the origin around t = 50.
        let ships = fleet(vec![]);
        let status = evaluate(&ships, &report("ship1", 100, 100.0, 100.0), Vec2::new(-2.0, -2.0));
        assert_eq!(status, Status::Red);
    }

    #[test]
    fn outbound_from_the_tower_is_green() {
        let ships = fleet(vec![]);
        let status = evaluate(&ships, &report("ship1", 100, 3.0, 0.0), Vec2::new(1.0, 0.0));
        assert_eq!(status, Status::Green);
    }

    // Ingest pipeline.

    #[test]
    fn first_report_is_stationary_and_green() {
        let traffic = Traffic::new();
        let eval = traffic
            .position_ship(report("alpha", 123, 1000.0, 1000.0))
            .unwrap();
        assert_eq!(eval.speed, 0.0);
        assert_eq!(eval.status, Status::Green);

        let positions = traffic.ship_positions("alpha").unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn speed_is_derived_from_the_previous_sample() {
        let traffic = Traffic::new();
        traffic
            .position_ship(report("alpha", 123, 1000.0, 1000.0))
            .unwrap();
        let eval = traffic
            .position_ship(report("alpha", 124, 1001.0, 1001.0))
            .unwrap();
        assert!((eval.speed - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(eval.status, Status::Green);
    }

    #[test]
    fn stale_or_repeated_time_is_rejected_without_mutation() {
        let traffic = Traffic::new();
        traffic
            .position_ship(report("alpha", 124, 1000.0, 1000.0))
            .unwrap();

        let same = traffic.position_ship(report("alpha", 124, 1005.0, 1000.0));
        assert_eq!(same.unwrap_err(), TrafficError::TimeInPast);
        let earlier = traffic.position_ship(report("alpha", 100, 1005.0, 1000.0));
        assert_eq!(earlier.unwrap_err(), TrafficError::TimeInPast);

        let positions = traffic.ship_positions("alpha").unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].position, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn future_time_is_rejected_without_mutation() {
        let traffic = Traffic::new();
        let future = Utc::now().timestamp() + 3600;
        let err = traffic.position_ship(report("alpha", future, 1000.0, 1000.0));
        assert_eq!(err.unwrap_err(), TrafficError::TimeInFuture);
        assert!(traffic.ships().is_empty());
    }

    #[test]
    fn reporting_velocity_is_clamped_to_max_speed() {
        let traffic = Traffic::new();
        traffic
            .position_ship(report("alpha", 100, 1000.0, 1000.0))
            .unwrap();
        let eval = traffic
            .position_ship(report("alpha", 101, 1500.0, 1000.0))
            .unwrap();
        assert_eq!(eval.speed, MAX_SPEED);

        let positions = traffic.ship_positions("alpha").unwrap();
        assert!(positions[1].velocity.magnitude() <= MAX_SPEED + 1e-9);
        assert_eq!(positions[1].velocity, Vec2::new(MAX_SPEED, 0.0));
    }

    #[test]
    fn flush_empties_the_store() {
        let traffic = Traffic::new();
        traffic
            .position_ship(report("alpha", 123, 1000.0, 1000.0))
            .unwrap();
        traffic
            .position_ship(report("bravo", 124, 2000.0, 2000.0))
            .unwrap();

        traffic.flush();

        assert!(traffic.ships().is_empty());
        assert_eq!(
            traffic.ship_positions("alpha").unwrap_err(),
            TrafficError::NotFound
        );
    }

    #[test]
    fn summary_reflects_the_last_accepted_report() {
        let traffic = Traffic::new();
        traffic
            .position_ship(report("alpha", 123, 1000.0, 1000.0))
            .unwrap();
        traffic
            .position_ship(report("alpha", 125, 1004.0, 1000.0))
            .unwrap();
        // bravo parks just off alpha's projected position and goes yellow
        let eval = traffic
            .position_ship(report("bravo", 126, 1006.0, 1001.5))
            .unwrap();
        assert_eq!(eval.status, Status::Yellow);

        let mut ships = traffic.ships();
        ships.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(ships.len(), 2);

        assert_eq!(ships[0].id, "alpha");
        assert_eq!(ships[0].last_time, 125);
        assert_eq!(ships[0].last_speed, 2.0);
        assert_eq!(ships[0].last_position, Vec2::new(1004.0, 1000.0));

        assert_eq!(ships[1].id, "bravo");
        assert_eq!(ships[1].last_status, Status::Yellow);
    }

    #[test]
    fn unknown_ship_is_not_found() {
        let traffic = Traffic::new();
        assert_eq!(
            traffic.ship_positions("ghost").unwrap_err(),
            TrafficError::NotFound
        );
    }

    #[test]
    fn concurrent_ingest_keeps_histories_ordered() {
        let traffic = Traffic::new();

        std::thread::scope(|scope| {
            for ship in 0..8 {
                let traffic = &traffic;
                scope.spawn(move || {
                    let id = format!("ship-{ship}");
                    for step in 0..50_i64 {
                        let x = 10_000.0 + (ship as f64) * 1000.0 + step as f64;
                        traffic
                            .position_ship(Report {
                                id: id.clone(),
                                time: 100 + step,
                                position: Vec2::new(x, 10_000.0),
                            })
                            .unwrap();
                    }
                });
            }
        });

        let ships = traffic.ships();
        assert_eq!(ships.len(), 8);
        for ship in ships {
            let positions = traffic.ship_positions(&ship.id).unwrap();
            assert_eq!(positions.len(), 50);
            for pair in positions.windows(2) {
                assert!(pair[0].time < pair[1].time);
            }
        }
    }
}
