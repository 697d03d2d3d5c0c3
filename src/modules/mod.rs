//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the storage adapters coordinate handlers are wired to.

pub mod store;
