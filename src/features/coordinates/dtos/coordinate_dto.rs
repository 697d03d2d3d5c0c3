use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::coordinates::models::CoordinateDocument;

/// Request DTO for creating or fully replacing a coordinate
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CoordinatePayloadDto {
    /// Latitude in decimal degrees format
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    #[schema(minimum = -90.0, maximum = 90.0, example = 51.5)]
    pub lat: f64,

    /// Longitude in decimal degrees format
    #[validate(range(min = -180.0, max = 180.0, message = "lng must be between -180 and 180"))]
    #[schema(minimum = -180.0, maximum = 180.0, example = -0.12)]
    pub lng: f64,

    /// Optional notes about the location
    #[serde(default)]
    pub notes: Option<String>,
}

/// Response DTO for coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateResponseDto {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CoordinateDocument> for CoordinateResponseDto {
    fn from(d: CoordinateDocument) -> Self {
        Self {
            id: d.id,
            lat: d.lat,
            lng: d.lng,
            notes: d.notes,
            created_at: to_utc(d.created_at),
            updated_at: to_utc(d.updated_at),
        }
    }
}

fn to_utc(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(lat: f64, lng: f64) -> CoordinatePayloadDto {
        CoordinatePayloadDto {
            lat,
            lng,
            notes: None,
        }
    }

    #[test]
    fn test_payload_accepts_inclusive_bounds() {
        for (lat, lng) in [(-90.0, -180.0), (90.0, 180.0), (51.5, -0.12)] {
            assert!(payload(lat, lng).validate().is_ok());
        }
    }

    #[test]
    fn test_payload_rejects_out_of_range() {
        for (lat, lng) in [(95.0, 0.0), (-90.01, 0.0), (0.0, 180.5), (0.0, -181.0)] {
            assert!(payload(lat, lng).validate().is_err());
        }
    }

    #[test]
    fn test_payload_notes_default_to_none() {
        let dto: CoordinatePayloadDto = serde_json::from_str(r#"{"lat": 1, "lng": 2}"#).unwrap();
        assert_eq!(dto.lat, 1.0);
        assert_eq!(dto.notes, None);
    }

    #[test]
    fn test_response_serializes_null_notes_and_iso_timestamps() {
        let document = CoordinateDocument {
            id: "abc".to_string(),
            lat: 51.5,
            lng: -0.12,
            notes: None,
            created_at: bson::DateTime::from_millis(1_700_000_000_123),
            updated_at: bson::DateTime::from_millis(1_700_000_000_123),
        };

        let value = serde_json::to_value(CoordinateResponseDto::from(document)).unwrap();

        assert!(value["notes"].is_null());
        assert_eq!(value["created_at"], "2023-11-14T22:13:20.123Z");
        assert_eq!(value["created_at"], value["updated_at"]);
    }
}
