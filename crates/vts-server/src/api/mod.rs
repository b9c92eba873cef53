//! API routes for the traffic server.

mod ships;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use vts_core::Traffic;

pub fn routes() -> Router<Arc<Traffic>> {
    Router::new()
        .route("/api/v1/ships", get(ships::list_ships))
        .route("/api/v1/ships/:id", get(ships::get_ship))
        .route("/api/v1/ships/:id/position", post(ships::position_ship))
        .route("/api/v1/flush", post(ships::flush))
}
