mod coordinate;

pub use coordinate::{CoordinateChanges, CoordinateDocument};
