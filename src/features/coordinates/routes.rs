use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::coordinates::handlers;
use crate::features::coordinates::services::CoordinateService;

/// Create routes for the coordinates feature
///
/// The collection path answers with and without the trailing slash.
pub fn routes(service: Arc<CoordinateService>) -> Router {
    Router::new()
        .route(
            "/coordinates/",
            get(handlers::list_coordinates).post(handlers::create_coordinate),
        )
        .route(
            "/coordinates",
            get(handlers::list_coordinates).post(handlers::create_coordinate),
        )
        .route(
            "/coordinates/{id}",
            get(handlers::get_coordinate)
                .put(handlers::update_coordinate)
                .delete(handlers::delete_coordinate),
        )
        .with_state(service)
}
