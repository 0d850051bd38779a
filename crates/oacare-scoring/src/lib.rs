//! oacare-scoring
//!
//! Knee OA screening, risk reporting and travel triage. Pure functions over
//! `oacare-core` snapshots: no I/O, no persistence, no failure modes.
//!
//! Three separate scoring policies live here and are deliberately kept apart:
//!
//! - [`screening`]: the per-assessment result text, positive at 2 of 5;
//! - [`screening::counts_toward_reports`]: aggregate reports, positive at 3
//!   of 5 or when the result text names the disease;
//! - [`triage::severity`]: travel severity buckets (4+ severe, 2-3 moderate).

pub mod reporting;
pub mod screening;
pub mod triage;
