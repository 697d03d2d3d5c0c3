use utoipa::{Modify, OpenApi};

use crate::features::coordinates::{dtos as coordinates_dtos, handlers as coordinates_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        coordinates_handlers::create_coordinate,
        coordinates_handlers::list_coordinates,
        coordinates_handlers::get_coordinate,
        coordinates_handlers::update_coordinate,
        coordinates_handlers::delete_coordinate,
    ),
    components(
        schemas(
            ErrorResponse,
            coordinates_dtos::CoordinatePayloadDto,
            coordinates_dtos::CoordinateResponseDto,
        )
    ),
    tags(
        (name = "coordinates", description = "Geographic coordinate records"),
    ),
    info(
        title = "Coordinates API",
        version = "1.0.0",
        description = "API for managing geographic coordinates with MongoDB Atlas",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
