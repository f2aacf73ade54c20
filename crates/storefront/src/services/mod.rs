//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `cart` - Loading and saving the session cart
//! - `checkout` - Cart pricing and simulated payment confirmation

pub mod auth;
pub mod cart;
pub mod checkout;
