//! Swapline-api: HTTP API layer for Swapline
//!
//! Exposes pool listing, swap quotes and ranked route alternatives over a
//! small JSON API.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
