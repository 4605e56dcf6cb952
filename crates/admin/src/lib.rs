//! Gogn Membership Admin - internal membership roster panel.
//!
//! Library crate backing the `gogn-admin` binary. Exposed as a library so
//! the CLI can reuse the repositories and the member code assignor.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod roster;
pub mod routes;
pub mod state;
