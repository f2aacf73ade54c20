//! Domain models for the storefront.
//!
//! Database-backed records ([`User`], [`Product`]) and the session-stored
//! state that travels with a visitor ([`Cart`], [`CurrentUser`], [`Flash`]).

pub mod cart;
pub mod flash;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartAction};
pub use flash::{Flash, FlashLevel};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
