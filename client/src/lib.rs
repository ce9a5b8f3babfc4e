//! Command-line client for the todo service.
//!
//! The client talks to the HTTP API when a server is reachable and falls back
//! to a JSON file under its state directory when it is not. The choice is made
//! once, when the session starts, and every subsequent operation goes through
//! whichever side was picked.

pub mod api;
pub mod config;
pub mod identity;
pub mod local;
pub mod remote;
