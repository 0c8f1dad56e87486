//! HTTP surface of the webstore back office.
//!
//! The binary in `main.rs` wires configuration from the environment and
//! serves the router assembled in [`app`]. Everything below the routing
//! layer lives in the service crates; this crate only translates HTTP
//! requests into service calls and service results into responses.

pub mod app;
pub mod middleware;
