//! Pure domain logic for GigTrack: urgency classification, notification
//! feed derivation, list control, pagination math, and dashboard
//! aggregation.
//!
//! Nothing in this crate performs I/O or touches the database; everything
//! is unit-testable with plain values. Persistence lives in `gigtrack-db`,
//! HTTP wiring in `gigtrack-api`.

pub mod controller;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod project;
pub mod stats;
pub mod types;
