//! `hostwatch-remote`: `reqwest` adapter for the inventory service API.
//!
//! Implements every collaborator trait of `hostwatch-core` against the
//! service's JSON endpoints (`/login`, `/session`, `/logout`, `/computers`,
//! `/search`, `/health`).

pub mod client;
pub mod wire;

pub use client::InventoryClient;
pub use wire::HealthStatus;
