//! oacare-storage
//!
//! Persistence for OA Care records on a flat object store. The
//! [`ObjectStore`](store::ObjectStore) trait has an S3 backend for deployment
//! and an in-memory backend for local runs and tests; the record modules are
//! free functions over `&dyn ObjectStore`.

pub mod analysis;
pub mod assessments;
pub mod elderly;
pub mod error;
pub mod health_info;
pub mod memory;
pub mod results;
pub mod s3;
pub mod sequence;
pub mod state;
pub mod store;
pub mod users;
