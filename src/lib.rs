//! Coordinates API
//!
//! CRUD over geographic coordinate records stored in MongoDB.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
