//! Cart operations with boundary validation.

use crate::keyed_lock::KeyedMutex;
use std::sync::Arc;
use tezmarket_core::error::MarketError;
use tezmarket_core::repository::{CartRepository, NewCartItem, ProductRepository};
use tezmarket_core::types::{CartItem, CartItemId, Product, ProductId, UserId};

/// Highest quantity a single cart row can hold.
pub(crate) const MAX_QUANTITY: u32 = 99;

/// Result of a quantity update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartUpdate {
    /// The row now holds the given state.
    Updated(CartItem),
    /// Quantity zero removed the row.
    Removed,
}

/// Cart mutations and the defensive resolved-cart read.
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
    /// Shared with `CheckoutService` so a concurrent checkout cannot
    /// swallow an add that lands between its cart read and cart clear.
    user_locks: Arc<KeyedMutex<UserId>>,
}

impl CartService {
    /// Creates the service over its storage dependencies.
    ///
    /// `user_locks` must be the same map the checkout pipeline uses.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartRepository>,
        products: Arc<dyn ProductRepository>,
        user_locks: Arc<KeyedMutex<UserId>>,
    ) -> Self {
        Self {
            carts,
            products,
            user_locks,
        }
    }

    /// Adds `quantity` of a product to the user's cart, merging with an
    /// existing row for the same product.
    ///
    /// # Errors
    ///
    /// [`MarketError::InvalidQuantity`] outside 1..=99; storage failures.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: Option<ProductId>,
        quantity: u32,
    ) -> Result<CartItem, MarketError> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(MarketError::InvalidQuantity(quantity));
        }
        let _guard = self.user_locks.lock(user_id.clone()).await;
        let item = self
            .carts
            .upsert(NewCartItem {
                user_id,
                product_id,
                quantity,
            })
            .await?;
        Ok(item)
    }

    /// Replaces a row's quantity. Zero removes the row; a missing row is
    /// reported as `None`, not an error, so retries stay idempotent.
    ///
    /// # Errors
    ///
    /// [`MarketError::InvalidQuantity`] above 99; storage failures.
    pub async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<Option<CartUpdate>, MarketError> {
        if quantity > MAX_QUANTITY {
            return Err(MarketError::InvalidQuantity(quantity));
        }
        if quantity == 0 {
            let removed = self.carts.remove(id).await?;
            return Ok(removed.then_some(CartUpdate::Removed));
        }
        let updated = self.carts.set_quantity(id, quantity).await?;
        Ok(updated.map(CartUpdate::Updated))
    }

    /// Deletes a row unconditionally; missing rows are not an error.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    pub async fn remove(&self, id: CartItemId) -> Result<bool, MarketError> {
        Ok(self.carts.remove(id).await?)
    }

    /// The user's cart resolved against the catalog. Rows whose product no
    /// longer exists are excluded (and logged), never an error.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    pub async fn resolved_cart(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(CartItem, Product)>, MarketError> {
        let items = self.carts.items_for_user(user_id).await?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let product = match item.product_id.clone() {
                Some(product_id) => self.products.find(product_id).await?,
                None => None,
            };
            match product {
                Some(product) => out.push((item, product)),
                None => tracing::warn!(
                    cart_item_id = %item.id,
                    "cart row references a missing product, hiding it from the cart view"
                ),
            }
        }
        Ok(out)
    }

    /// Deletes every cart row for the user.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    pub async fn clear(&self, user_id: UserId) -> Result<(), MarketError> {
        let _guard = self.user_locks.lock(user_id.clone()).await;
        self.carts.clear_user(user_id).await?;
        Ok(())
    }
}
