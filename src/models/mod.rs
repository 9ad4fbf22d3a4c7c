//! Core data models for the bucketlist service.
//!
//! These entities map to database tables via `sqlx::FromRow` and serialize
//! as JSON via `serde`.

pub mod bucket_item;
pub mod bucketlist;
pub mod user;
