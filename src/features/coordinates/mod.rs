//! Geographic coordinate records.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/coordinates/` | Create a coordinate |
//! | GET | `/coordinates/` | List up to 100 coordinates (unspecified order) |
//! | GET | `/coordinates/{id}` | Get a coordinate |
//! | PUT | `/coordinates/{id}` | Replace lat/lng/notes |
//! | DELETE | `/coordinates/{id}` | Delete a coordinate |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;

pub use services::CoordinateService;
