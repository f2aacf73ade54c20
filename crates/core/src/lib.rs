//! Farmácia HBR Core - Shared types library.
//!
//! This crate provides the validated domain types used across all components:
//! - `storefront` - Public-facing pharmacy site
//! - `cli` - Command-line tools for schema setup and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, CPFs and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
