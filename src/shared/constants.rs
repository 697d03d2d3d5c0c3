/// Maximum number of records returned by the list endpoint.
/// There is no cursor: anything past this is omitted.
pub const LIST_LIMIT: i64 = 100;

/// Default collection holding coordinate documents
pub const DEFAULT_COLLECTION: &str = "coords_data";

// =============================================================================
// COORDINATE BOUNDS
// =============================================================================

pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;
pub const LNG_MIN: f64 = -180.0;
pub const LNG_MAX: f64 = 180.0;
