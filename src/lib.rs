//! hello-responder - single-connection HTTP responder
//!
//! Accepts one connection at a time, answers `GET /` with a fixed page and
//! everything else with a 4xx, then closes the connection.

pub mod config;
pub mod http;
pub mod server;
