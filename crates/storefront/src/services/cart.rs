//! Session-backed cart.
//!
//! [`corner_shop_core::Cart`] holds the rules; this adapter moves the value
//! in and out of the visitor's session. Each request loads the cart, applies
//! one operation and saves it, so a session only ever sees whole states.

use chrono::Utc;
use thiserror::Error;
use tower_sessions::Session;

use corner_shop_core::{Cart, CartAck, CartError, OrderId};

use crate::db::{RecordStore, RepositoryError, insert_document};
use crate::models::{CurrentUser, session_keys};

/// Errors from changing or checking out a session cart.
#[derive(Debug, Error)]
pub enum CartSessionError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("failed to store order: {0}")]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// The cart stored in one visitor's session.
pub struct CartSession<'a> {
    session: &'a Session,
}

impl<'a> CartSession<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Load the cart, empty if the session has none.
    ///
    /// A cart that no longer decodes is logged and replaced by an empty one.
    pub async fn load(&self) -> Cart {
        match self.session.get::<Cart>(session_keys::CART).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session cart");
                Cart::new()
            }
        }
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::CART, cart).await
    }

    /// Load, apply `op`, save.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn update<F>(&self, op: F) -> Result<CartAck, tower_sessions::session::Error>
    where
        F: FnOnce(&mut Cart) -> CartAck,
    {
        let mut cart = self.load().await;
        let ack = op(&mut cart);
        self.save(&cart).await?;
        Ok(ack)
    }

    /// Like [`CartSession::update`], for operations that may be refused.
    ///
    /// Nothing is saved when `op` fails.
    ///
    /// # Errors
    ///
    /// Returns `CartSessionError::Cart` with the refusal, or
    /// `CartSessionError::Session` if the session cannot be modified.
    pub async fn try_update<F>(&self, op: F) -> Result<CartAck, CartSessionError>
    where
        F: FnOnce(&mut Cart) -> Result<CartAck, CartError>,
    {
        let mut cart = self.load().await;
        let ack = op(&mut cart)?;
        self.save(&cart).await?;
        Ok(ack)
    }

    /// Turn the cart into an order.
    ///
    /// The order is stored first and the cart is cleared only once that
    /// succeeds. If the insert fails the cart is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `CartSessionError::Cart` if the cart is empty,
    /// `CartSessionError::Repository` if the order can't be stored.
    pub async fn checkout(
        &self,
        store: &dyn RecordStore,
        user: Option<&CurrentUser>,
    ) -> Result<OrderId, CartSessionError> {
        let mut cart = self.load().await;
        let order = cart.checkout(user.map(|u| u.username.as_str()), Utc::now())?;

        let order_id = OrderId::from(insert_document(store, &order).await?);

        cart.clear();
        self.save(&cart).await?;

        tracing::info!(
            %order_id,
            user = %order.user,
            lines = order.products.len(),
            total = %order.total,
            "Order placed"
        );
        Ok(order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;
    use tower_sessions::MemoryStore;

    use corner_shop_core::{CartItem, Collection, Price, RecordId, UserId};

    use super::*;
    use crate::db::memory::MemoryRecordStore;
    use crate::db::{FindQuery, Record, find_documents};

    /// A store whose inserts always fail.
    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn insert(
            &self,
            _collection: Collection,
            _doc: Value,
        ) -> Result<RecordId, RepositoryError> {
            Err(RepositoryError::DataCorruption("disk on fire".into()))
        }

        async fn find(
            &self,
            _collection: Collection,
            _query: &FindQuery,
        ) -> Result<Vec<Record<Value>>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn widget(qty: u32) -> CartItem {
        CartItem::new("p1", "Widget", Price::parse("9.99").unwrap(), qty).unwrap()
    }

    #[tokio::test]
    async fn test_update_persists_between_loads() {
        let session = session();
        let cart = CartSession::new(&session);

        let ack = cart.try_update(|c| c.add(widget(2))).await.unwrap();
        assert_eq!(ack.to_string(), "Widget added to cart!");

        let reloaded = CartSession::new(&session).load().await;
        assert_eq!(reloaded.items()[0].qty(), 2);
    }

    #[tokio::test]
    async fn test_try_update_refused_saves_nothing() {
        let session = session();
        let cart = CartSession::new(&session);

        let result = cart.try_update(|c| c.add_quantity("p1", 3)).await;
        assert!(matches!(
            result,
            Err(CartSessionError::Cart(CartError::NotInCart))
        ));
        assert!(cart.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_add_leaves_session_cart_usable() {
        let session = session();
        let cart = CartSession::new(&session);
        let huge = Price::parse("50000000000000000000000000000").unwrap();
        cart.try_update(|c| c.add(CartItem::new("big", "Big", huge, 1).unwrap()))
            .await
            .unwrap();

        let result = cart
            .try_update(|c| c.add(CartItem::new("big", "Big", huge, 1).unwrap()))
            .await;
        assert!(matches!(result, Err(CartSessionError::Cart(CartError::TooLarge))));

        let stored = cart.load().await;
        assert_eq!(stored.items()[0].qty(), 1);
        assert_eq!(stored.total(), huge);
    }

    #[tokio::test]
    async fn test_prices_survive_the_session_exactly() {
        let session = session();
        let cart = CartSession::new(&session);
        let price = Price::parse("0.1234567890123456789").unwrap();
        cart.try_update(|c| c.add(CartItem::new("p1", "Tiny", price, 3).unwrap()))
            .await
            .unwrap();

        let reloaded = CartSession::new(&session).load().await;
        assert_eq!(reloaded.items()[0].price(), price);
        assert_eq!(
            reloaded.total(),
            Price::parse("0.3703703670370370367").unwrap()
        );
    }

    #[tokio::test]
    async fn test_checkout_records_user_label() {
        let session = session();
        let store = MemoryRecordStore::new();
        let cart = CartSession::new(&session);
        cart.try_update(|c| c.add(widget(1))).await.unwrap();

        let user = CurrentUser {
            user_id: UserId::new(7),
            username: "Ann".into(),
        };
        cart.checkout(&store, Some(&user)).await.unwrap();

        let orders = find_documents::<corner_shop_core::Order>(&store, &FindQuery::all())
            .await
            .unwrap();
        assert_eq!(orders[0].doc.user, "Ann");
        assert!(cart.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_cart() {
        let session = session();
        let cart = CartSession::new(&session);
        cart.try_update(|c| c.add(widget(5))).await.unwrap();

        let result = cart.checkout(&BrokenStore, None).await;
        assert!(matches!(result, Err(CartSessionError::Repository(_))));

        let after = cart.load().await;
        assert_eq!(after.items().len(), 1);
        assert_eq!(after.total().to_string(), "$49.95");
    }

    #[tokio::test]
    async fn test_empty_checkout_stores_nothing() {
        let session = session();
        let store = MemoryRecordStore::new();

        let result = CartSession::new(&session).checkout(&store, None).await;
        assert!(matches!(result, Err(CartSessionError::Cart(CartError::Empty))));
        assert_eq!(store.count(Collection::Orders).await, 0);
    }
}
