//! oacare-audit
//!
//! Structured audit events for record changes and sign-ins, emitted through
//! `tracing` alongside the request log.

pub mod events;
