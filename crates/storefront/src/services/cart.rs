//! Loading and saving the cart held in the visitor's session.
//!
//! An empty cart is never stored: removing the last entry deletes the
//! session key, so "no cart" and "empty cart" look the same.

use tower_sessions::Session;

use crate::models::{Cart, session_keys};

/// Read the cart from the session, or an empty one if there is none.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session, dropping the key when it is empty.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        clear(session).await
    } else {
        session.insert(session_keys::CART, cart).await
    }
}

/// Remove the cart from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(session_keys::CART).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use hbr_pharmacy_core::ProductId;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_absent_cart_loads_empty() {
        let session = session();
        assert!(load(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_and_reload() {
        let session = session();
        let mut cart = Cart::new();
        cart.add(ProductId::new(3));
        cart.add(ProductId::new(3));
        store(&session, &cart).await.unwrap();

        let loaded = load(&session).await.unwrap();
        assert_eq!(loaded.quantity(ProductId::new(3)), 2);
    }

    #[tokio::test]
    async fn test_emptied_cart_removes_key() {
        let session = session();
        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        store(&session, &cart).await.unwrap();

        cart.clear();
        store(&session, &cart).await.unwrap();

        let raw: Option<serde_json::Value> = session.get(session_keys::CART).await.unwrap();
        assert!(raw.is_none());
    }
}
