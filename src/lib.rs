//! A small JSON API for user-owned bucketlists and their items.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::routes::app;
pub use state::AppState;
