//! oacare-core
//!
//! Pure domain types, id codes, geocoordinate adapters, pagination and object
//! key conventions. No AWS SDK dependency; this is the shared vocabulary of
//! the OA Care system.

pub mod error;
pub mod geo;
pub mod ids;
pub mod keys;
pub mod models;
pub mod page;
