//! Storage abstractions.
//!
//! Repositories are constructed once at process start and injected into the
//! services that need them; seeding is an explicit bootstrap step, never an
//! import-time side effect. The in-memory backend in `tezmarket-memory` is
//! the shipped implementation; the traits leave room for a relational one.
//!
//! # Dyn compatibility
//!
//! Methods return explicit `Pin<Box<dyn Future>>` instead of `async fn` so
//! the traits can be held as `Arc<dyn CartRepository>` and friends and
//! captured by spawned tasks. Arguments are taken by value for the same
//! reason: the returned future must not borrow anything but the receiver.

use crate::error::StorageError;
use crate::lifecycle::OrderStatus;
use crate::types::{
    CartItem, CartItemId, Category, CategoryId, Money, Notification, NotificationId,
    NotificationKind, Order, OrderId, Product, ProductId, UserId,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Future type returned by repository methods.
pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// A product to be inserted; the repository assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Display weight/volume.
    pub weight: Option<String>,
    /// Catalog image.
    pub image_url: Option<String>,
    /// Owning category.
    pub category_id: Option<CategoryId>,
    /// Orderable flag.
    pub in_stock: bool,
    /// Popular-rail flag.
    pub is_popular: bool,
}

/// A category to be inserted; the repository assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// URL-stable slug.
    pub slug: String,
    /// Category image.
    pub image_url: Option<String>,
    /// Listing order.
    pub sort_order: i32,
}

/// A cart row to be added; merged with an existing (user, product) row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCartItem {
    /// Owning user.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: Option<ProductId>,
    /// Requested quantity.
    pub quantity: u32,
}

/// An order to be persisted; the repository assigns the id.
///
/// `total_amount` arrives already computed by the pricing engine and
/// `created_at` by the caller's [`crate::environment::Clock`] - the
/// repository stores, it does not decide.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    /// Owning user.
    pub user_id: UserId,
    /// Authoritative total.
    pub total_amount: Money,
    /// Initial status.
    pub status: OrderStatus,
    /// Delivery address.
    pub delivery_address: String,
    /// Courier comment.
    pub comment: Option<String>,
    /// Packer comment.
    pub packer_comment: Option<String>,
    /// Audit copy of the applied promo code.
    pub promo_code: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A notification to be appended; the repository assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    /// Receiving user.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Notification category.
    pub kind: NotificationKind,
    /// Optional order back-reference.
    pub related_order_id: Option<OrderId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Catalog product storage.
pub trait ProductRepository: Send + Sync {
    /// All orderable (in-stock) products.
    fn list(&self) -> RepoFuture<'_, Vec<Product>>;

    /// Orderable products in one category.
    fn list_by_category(&self, category_id: CategoryId) -> RepoFuture<'_, Vec<Product>>;

    /// Orderable products flagged popular.
    fn list_popular(&self) -> RepoFuture<'_, Vec<Product>>;

    /// Case-insensitive substring search over name and description.
    fn search(&self, query: String) -> RepoFuture<'_, Vec<Product>>;

    /// Looks up a product by id, in stock or not.
    fn find(&self, id: ProductId) -> RepoFuture<'_, Option<Product>>;

    /// Inserts a product and returns it with its assigned id.
    fn insert(&self, new: NewProduct) -> RepoFuture<'_, Product>;
}

/// Catalog category storage.
pub trait CategoryRepository: Send + Sync {
    /// All categories, ascending by sort order.
    fn list(&self) -> RepoFuture<'_, Vec<Category>>;

    /// Inserts a category and returns it with its assigned id.
    fn insert(&self, new: NewCategory) -> RepoFuture<'_, Category>;
}

/// Per-user cart storage.
pub trait CartRepository: Send + Sync {
    /// Adds a row, merging with an existing (user, product) pair.
    ///
    /// When a row for the pair already exists its quantity is incremented
    /// by the requested amount; the result is clamped to 99. At most one
    /// row per (user, product) pair ever exists.
    fn upsert(&self, new: NewCartItem) -> RepoFuture<'_, CartItem>;

    /// Replaces a row's quantity. Returns `None` if the row is gone.
    fn set_quantity(&self, id: CartItemId, quantity: u32) -> RepoFuture<'_, Option<CartItem>>;

    /// Deletes a row unconditionally. Returns whether it existed.
    fn remove(&self, id: CartItemId) -> RepoFuture<'_, bool>;

    /// All cart rows for a user, including rows with dangling product
    /// references - resolution is the caller's concern.
    fn items_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<CartItem>>;

    /// Deletes every cart row for a user. Returns whether any existed.
    fn clear_user(&self, user_id: UserId) -> RepoFuture<'_, bool>;
}

/// Order storage.
pub trait OrderRepository: Send + Sync {
    /// Persists an order and returns it with its assigned id.
    fn insert(&self, new: NewOrder) -> RepoFuture<'_, Order>;

    /// Looks up an order by id.
    fn find(&self, id: OrderId) -> RepoFuture<'_, Option<Order>>;

    /// A user's orders, newest first.
    fn list_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<Order>>;

    /// Every order in the system, newest first.
    fn list_all(&self) -> RepoFuture<'_, Vec<Order>>;

    /// Overwrites an order's status. Returns `None` if the order is gone.
    ///
    /// This is raw storage; the lifecycle rules live in
    /// `tezmarket-runtime`, which is the only caller.
    fn set_status(&self, id: OrderId, status: OrderStatus) -> RepoFuture<'_, Option<Order>>;
}

/// Append-only per-user notification storage.
pub trait NotificationRepository: Send + Sync {
    /// Appends a notification and returns it with its assigned id.
    fn insert(&self, new: NewNotification) -> RepoFuture<'_, Notification>;

    /// A user's notifications, newest first.
    fn list_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<Notification>>;

    /// How many of a user's notifications are unread.
    fn unread_count(&self, user_id: UserId) -> RepoFuture<'_, u64>;

    /// Marks one notification read. Returns `None` if it is gone.
    fn mark_read(&self, id: NotificationId) -> RepoFuture<'_, Option<Notification>>;

    /// Marks all of a user's notifications read. Returns whether any
    /// changed.
    fn mark_all_read(&self, user_id: UserId) -> RepoFuture<'_, bool>;
}
