use mongodb::bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Stored coordinate document.
///
/// `id` is the external key; MongoDB's own `_id` is ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateDocument {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Full replacement applied by the update operation.
/// `id` and `created_at` are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateChanges {
    pub lat: f64,
    pub lng: f64,
    pub notes: Option<String>,
    pub updated_at: DateTime,
}

impl CoordinateChanges {
    /// MongoDB update document. A missing `notes` is unset rather than
    /// written as null, which the collection validator would reject.
    pub fn to_update_document(&self) -> Document {
        let mut set = doc! {
            "lat": self.lat,
            "lng": self.lng,
            "updated_at": self.updated_at,
        };

        match &self.notes {
            Some(notes) => {
                set.insert("notes", notes.clone());
                doc! { "$set": set }
            }
            None => doc! { "$set": set, "$unset": { "notes": "" } },
        }
    }

    /// Apply the changes to an in-memory document
    pub fn apply_to(&self, document: &mut CoordinateDocument) {
        document.lat = self.lat;
        document.lng = self.lng;
        document.notes = self.notes.clone();
        document.updated_at = self.updated_at;
    }
}
