//! oacare-auth
//!
//! Session tokens (HS256 JWT, one day) and bcrypt password hashing.

pub mod error;
pub mod jwt;
pub mod password;
