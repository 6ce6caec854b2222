//! Client for the job-application tracking API.
//!
//! `SessionContext` carries the authenticated identity, `ApiClient` talks to the backend,
//! and the `views` module holds the headless page controllers the CLI drives.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
