//! Ship ingest and query handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use vts_core::{Report, Sample, Status, Traffic, TrafficError, Vec2};

/// Integer coordinates as they appear on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub time: i64,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub time: i64,
    pub x: i64,
    pub y: i64,
    pub speed: i64,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct ShipSummary {
    pub id: String,
    pub last_time: String,
    pub last_status: Status,
    pub last_speed: i64,
    pub last_position: Point,
}

#[derive(Debug, Serialize)]
pub struct ShipHistory {
    pub id: String,
    pub positions: Vec<PositionRecord>,
}

#[derive(Debug, Serialize)]
pub struct PositionRecord {
    pub time: i64,
    pub speed: i64,
    pub position: Point,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

fn point(position: Vec2) -> Point {
    Point {
        x: position.x as i64,
        y: position.y as i64,
    }
}

fn position_record(sample: &Sample) -> PositionRecord {
    PositionRecord {
        time: sample.time,
        speed: sample.velocity.magnitude() as i64,
        position: point(sample.position),
    }
}

pub async fn list_ships(State(traffic): State<Arc<Traffic>>) -> Json<Vec<ShipSummary>> {
    let ships = traffic
        .ships()
        .into_iter()
        .map(|ship| ShipSummary {
            id: ship.id,
            last_time: ship.last_time.to_string(),
            last_status: ship.last_status,
            last_speed: ship.last_speed as i64,
            last_position: point(ship.last_position),
        })
        .collect();
    Json(ships)
}

pub async fn get_ship(
    State(traffic): State<Arc<Traffic>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match traffic.ship_positions(&id) {
        Ok(positions) => (
            StatusCode::OK,
            Json(ShipHistory {
                id,
                positions: positions.iter().map(position_record).collect(),
            }),
        )
            .into_response(),
        Err(err) => (StatusCode::NOT_FOUND, error_body(err.to_string())).into_response(),
    }
}

pub async fn position_ship(
    State(traffic): State<Arc<Traffic>>,
    Path(id): Path<String>,
    Json(request): Json<PositionRequest>,
) -> impl IntoResponse {
    if id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, error_body("ship id can not be empty"))
            .into_response();
    }
    if request.time <= 0 {
        return (StatusCode::BAD_REQUEST, error_body("time must be positive")).into_response();
    }

    let result = traffic.position_ship(Report {
        id,
        time: request.time,
        position: Vec2::new(request.x as f64, request.y as f64),
    });

    match result {
        Ok(eval) => (
            StatusCode::CREATED,
            Json(PositionResponse {
                time: request.time,
                x: request.x,
                y: request.y,
                speed: eval.speed as i64,
                status: eval.status,
            }),
        )
            .into_response(),
        Err(err @ TrafficError::TimeInPast) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_body(err.to_string())).into_response()
        }
        Err(err @ TrafficError::TimeInFuture) => {
            (StatusCode::BAD_REQUEST, error_body(err.to_string())).into_response()
        }
        Err(err) => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(err.to_string())).into_response()
        }
    }
}

pub async fn flush(State(traffic): State<Arc<Traffic>>) -> StatusCode {
    traffic.flush();
    StatusCode::NO_CONTENT
}
