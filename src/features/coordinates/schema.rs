//! Storage-side rules for coordinate documents.
//!
//! The rule table below is rendered into the MongoDB `$jsonSchema`
//! validator installed on the collection, and is also evaluated directly by
//! [`check_document`] for backends that have no validator of their own.
//! It is independent from the request DTO validation on purpose: the two
//! must agree, and each is tested on its own.

use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Database, IndexModel};
use thiserror::Error;
use tracing::{debug, info};

use crate::shared::constants::{LAT_MAX, LAT_MIN, LNG_MAX, LNG_MIN};

/// MongoDB server error code for "collection already exists"
const NAMESPACE_EXISTS: i32 = 48;

/// Fields carrying a single ascending index
pub const INDEXED_FIELDS: &[&str] = &["lat", "lng"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsonKind {
    String,
    Double,
    Date,
}

impl BsonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BsonKind::String => "string",
            BsonKind::Double => "double",
            BsonKind::Date => "date",
        }
    }

    fn matches(self, value: &Bson) -> bool {
        matches!(
            (self, value),
            (BsonKind::String, Bson::String(_))
                | (BsonKind::Double, Bson::Double(_))
                | (BsonKind::Date, Bson::DateTime(_))
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: BsonKind,
    pub required: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub description: &'static str,
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "id",
        kind: BsonKind::String,
        required: true,
        minimum: None,
        maximum: None,
        description: "Primary key - must be a string",
    },
    FieldRule {
        name: "notes",
        kind: BsonKind::String,
        required: false,
        minimum: None,
        maximum: None,
        description: "Optional notes field",
    },
    FieldRule {
        name: "lat",
        kind: BsonKind::Double,
        required: true,
        minimum: Some(LAT_MIN),
        maximum: Some(LAT_MAX),
        description: "Latitude in decimal degrees format",
    },
    FieldRule {
        name: "lng",
        kind: BsonKind::Double,
        required: true,
        minimum: Some(LNG_MIN),
        maximum: Some(LNG_MAX),
        description: "Longitude in decimal degrees format",
    },
    FieldRule {
        name: "created_at",
        kind: BsonKind::Date,
        required: true,
        minimum: None,
        maximum: None,
        description: "Creation timestamp",
    },
    FieldRule {
        name: "updated_at",
        kind: BsonKind::Date,
        required: true,
        minimum: None,
        maximum: None,
        description: "Last update timestamp",
    },
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("missing required field '{0}'")]
    Missing(&'static str),

    #[error("field '{field}' must be of type {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' is below the minimum of {limit}")]
    BelowMinimum { field: &'static str, limit: f64 },

    #[error("field '{field}' is above the maximum of {limit}")]
    AboveMaximum { field: &'static str, limit: f64 },
}

/// The `$jsonSchema` body built from [`FIELD_RULES`]
pub fn json_schema() -> Document {
    let required: Vec<&str> = FIELD_RULES
        .iter()
        .filter(|rule| rule.required)
        .map(|rule| rule.name)
        .collect();

    let mut properties = Document::new();
    for rule in FIELD_RULES {
        let mut property = doc! {
            "bsonType": rule.kind.as_str(),
            "description": rule.description,
        };
        if let Some(minimum) = rule.minimum {
            property.insert("minimum", minimum);
        }
        if let Some(maximum) = rule.maximum {
            property.insert("maximum", maximum);
        }
        properties.insert(rule.name, property);
    }

    doc! {
        "bsonType": "object",
        "required": required,
        "properties": properties,
    }
}

/// Collection validator passed to `collMod`
pub fn validator_document() -> Document {
    doc! { "$jsonSchema": json_schema() }
}

/// Evaluate [`FIELD_RULES`] against a document, the way the server-side
/// validator would. Returns the first violation found.
pub fn check_document(document: &Document) -> Result<(), SchemaViolation> {
    for rule in FIELD_RULES {
        let Some(value) = document.get(rule.name) else {
            if rule.required {
                return Err(SchemaViolation::Missing(rule.name));
            }
            continue;
        };

        if !rule.kind.matches(value) {
            return Err(SchemaViolation::WrongType {
                field: rule.name,
                expected: rule.kind.as_str(),
            });
        }

        if let Bson::Double(number) = value {
            if let Some(limit) = rule.minimum.filter(|limit| number < limit) {
                return Err(SchemaViolation::BelowMinimum {
                    field: rule.name,
                    limit,
                });
            }
            if let Some(limit) = rule.maximum.filter(|limit| number > limit) {
                return Err(SchemaViolation::AboveMaximum {
                    field: rule.name,
                    limit,
                });
            }
        }
    }

    Ok(())
}

/// Bring the collection into a validated, indexed state.
///
/// Safe to run repeatedly: an existing collection is kept, index creation
/// is a no-op when the index exists, and `collMod` overwrites the validator.
/// Connectivity failures are returned unchanged; nothing is retried.
pub async fn ensure_schema(db: &Database, collection: &str) -> Result<(), MongoError> {
    let existing = db.list_collection_names().await?;

    if existing.iter().any(|name| name == collection) {
        debug!("Collection '{}' already exists", collection);
    } else {
        match db.create_collection(collection).await {
            Ok(()) => info!("Collection '{}' created", collection),
            Err(e) if is_namespace_exists(&e) => {
                debug!("Collection '{}' was created concurrently", collection)
            }
            Err(e) => return Err(e),
        }
    }

    let coll = db.collection::<Document>(collection);
    for field in INDEXED_FIELDS {
        let mut keys = Document::new();
        keys.insert(*field, 1);

        let result = coll
            .create_index(IndexModel::builder().keys(keys).build())
            .await?;
        info!("Index '{}' ensured on '{}'", result.index_name, collection);
    }

    db.run_command(doc! {
        "collMod": collection,
        "validator": validator_document(),
        "validationLevel": "strict",
        "validationAction": "error",
    })
    .await?;
    info!("Schema validation applied to '{}'", collection);

    Ok(())
}

fn is_namespace_exists(error: &MongoError) -> bool {
    matches!(*error.kind, ErrorKind::Command(ref e) if e.code == NAMESPACE_EXISTS)
}
