//! HTTP handlers, grouped by resource.

pub mod auth_handlers;
pub mod bucketlist_handlers;
pub mod health_handlers;
pub mod user_handlers;

mod json_body;

pub use json_body::JsonBody;
