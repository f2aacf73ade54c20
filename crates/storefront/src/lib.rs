//! Farmácia HBR storefront library.
//!
//! Everything the binary serves lives here so the router can be driven
//! in-process by tests and reused by the `hbr-cli` tool.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
