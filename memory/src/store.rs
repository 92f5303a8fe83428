//! `RwLock`-guarded map storage with per-user indexes.

use std::collections::{HashMap, HashSet};
use tezmarket_core::lifecycle::OrderStatus;
use tezmarket_core::repository::{
    CartRepository, CategoryRepository, NewCartItem, NewCategory, NewNotification, NewOrder,
    NewProduct, NotificationRepository, OrderRepository, ProductRepository, RepoFuture,
};
use tezmarket_core::types::{
    CartItem, CartItemId, Category, CategoryId, Notification, NotificationId, Order, OrderId,
    Product, ProductId, UserId,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Highest quantity a single cart row can hold.
const MAX_QUANTITY: u32 = 99;

#[derive(Default)]
struct CartState {
    items: HashMap<CartItemId, CartItem>,
    /// Rows per user, maintained on every mutation. Doubles as the
    /// invalidation of any per-user cart view.
    by_user: HashMap<UserId, HashSet<CartItemId>>,
}

#[derive(Default)]
struct OrderState {
    orders: HashMap<OrderId, Order>,
    /// Insertion order, oldest first. Listing reverses it so "newest
    /// first" stays deterministic even when timestamps collide.
    sequence: Vec<OrderId>,
    by_user: HashMap<UserId, Vec<OrderId>>,
}

#[derive(Default)]
struct NotificationState {
    items: HashMap<NotificationId, Notification>,
    /// Append order per user, oldest first.
    by_user: HashMap<UserId, Vec<NotificationId>>,
}

/// In-memory implementation of every repository trait.
///
/// Construct one per process and share it as `Arc<MemoryStore>`; the
/// `Arc` coerces to each `Arc<dyn …Repository>` the services expect.
#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    cart: RwLock<CartState>,
    orders: RwLock<OrderState>,
    notifications: RwLock<NotificationState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

impl ProductRepository for MemoryStore {
    fn list(&self) -> RepoFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let products = self.products.read().await;
            let mut out: Vec<Product> =
                products.values().filter(|p| p.in_stock).cloned().collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(out)
        })
    }

    fn list_by_category(&self, category_id: CategoryId) -> RepoFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let products = self.products.read().await;
            let mut out: Vec<Product> = products
                .values()
                .filter(|p| p.in_stock && p.category_id.as_ref() == Some(&category_id))
                .cloned()
                .collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(out)
        })
    }

    fn list_popular(&self) -> RepoFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let products = self.products.read().await;
            let mut out: Vec<Product> = products
                .values()
                .filter(|p| p.in_stock && p.is_popular)
                .cloned()
                .collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(out)
        })
    }

    fn search(&self, query: String) -> RepoFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let needle = query.to_lowercase();
            let products = self.products.read().await;
            let mut out: Vec<Product> = products
                .values()
                .filter(|p| {
                    p.in_stock
                        && (p.name.to_lowercase().contains(&needle)
                            || p.description
                                .as_ref()
                                .is_some_and(|d| d.to_lowercase().contains(&needle)))
                })
                .cloned()
                .collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(out)
        })
    }

    fn find(&self, id: ProductId) -> RepoFuture<'_, Option<Product>> {
        Box::pin(async move { Ok(self.products.read().await.get(&id).cloned()) })
    }

    fn insert(&self, new: NewProduct) -> RepoFuture<'_, Product> {
        Box::pin(async move {
            let product = Product {
                id: ProductId::new(fresh_id("product")),
                name: new.name,
                description: new.description,
                price: new.price,
                weight: new.weight,
                image_url: new.image_url,
                category_id: new.category_id,
                in_stock: new.in_stock,
                is_popular: new.is_popular,
            };
            self.products
                .write()
                .await
                .insert(product.id.clone(), product.clone());
            Ok(product)
        })
    }
}

impl CategoryRepository for MemoryStore {
    fn list(&self) -> RepoFuture<'_, Vec<Category>> {
        Box::pin(async move {
            let categories = self.categories.read().await;
            let mut out: Vec<Category> = categories.values().cloned().collect();
            out.sort_by_key(|c| c.sort_order);
            Ok(out)
        })
    }

    fn insert(&self, new: NewCategory) -> RepoFuture<'_, Category> {
        Box::pin(async move {
            let category = Category {
                id: CategoryId::new(fresh_id("category")),
                name: new.name,
                slug: new.slug,
                image_url: new.image_url,
                sort_order: new.sort_order,
            };
            self.categories
                .write()
                .await
                .insert(category.id.clone(), category.clone());
            Ok(category)
        })
    }
}

impl CartRepository for MemoryStore {
    fn upsert(&self, new: NewCartItem) -> RepoFuture<'_, CartItem> {
        Box::pin(async move {
            let mut cart = self.cart.write().await;

            // Merge with an existing row for the same (user, product) pair.
            let existing_id = cart
                .by_user
                .get(&new.user_id)
                .into_iter()
                .flatten()
                .find(|id| {
                    cart.items
                        .get(id)
                        .is_some_and(|item| item.product_id == new.product_id)
                })
                .cloned();

            if let Some(id) = existing_id {
                if let Some(item) = cart.items.get_mut(&id) {
                    item.quantity = item.quantity.saturating_add(new.quantity).min(MAX_QUANTITY);
                    return Ok(item.clone());
                }
            }

            let item = CartItem {
                id: CartItemId::new(fresh_id("cart")),
                user_id: new.user_id,
                product_id: new.product_id,
                quantity: new.quantity.clamp(1, MAX_QUANTITY),
            };
            cart.by_user
                .entry(item.user_id.clone())
                .or_default()
                .insert(item.id.clone());
            cart.items.insert(item.id.clone(), item.clone());
            Ok(item)
        })
    }

    fn set_quantity(&self, id: CartItemId, quantity: u32) -> RepoFuture<'_, Option<CartItem>> {
        Box::pin(async move {
            let mut cart = self.cart.write().await;
            let Some(item) = cart.items.get_mut(&id) else {
                return Ok(None);
            };
            item.quantity = quantity;
            Ok(Some(item.clone()))
        })
    }

    fn remove(&self, id: CartItemId) -> RepoFuture<'_, bool> {
        Box::pin(async move {
            let mut cart = self.cart.write().await;
            let Some(item) = cart.items.remove(&id) else {
                return Ok(false);
            };
            if let Some(ids) = cart.by_user.get_mut(&item.user_id) {
                ids.remove(&id);
            }
            Ok(true)
        })
    }

    fn items_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<CartItem>> {
        Box::pin(async move {
            let cart = self.cart.read().await;
            let mut out: Vec<CartItem> = cart
                .by_user
                .get(&user_id)
                .into_iter()
                .flatten()
                .filter_map(|id| cart.items.get(id).cloned())
                .collect();
            out.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(out)
        })
    }

    fn clear_user(&self, user_id: UserId) -> RepoFuture<'_, bool> {
        Box::pin(async move {
            let mut cart = self.cart.write().await;
            let Some(ids) = cart.by_user.remove(&user_id) else {
                return Ok(false);
            };
            let any = !ids.is_empty();
            for id in ids {
                cart.items.remove(&id);
            }
            Ok(any)
        })
    }
}

impl OrderRepository for MemoryStore {
    fn insert(&self, new: NewOrder) -> RepoFuture<'_, Order> {
        Box::pin(async move {
            let order = Order {
                id: OrderId::new(fresh_id("order")),
                user_id: new.user_id,
                total_amount: new.total_amount,
                status: new.status,
                delivery_address: new.delivery_address,
                comment: new.comment,
                packer_comment: new.packer_comment,
                promo_code: new.promo_code,
                created_at: new.created_at,
            };
            let mut state = self.orders.write().await;
            state.sequence.push(order.id.clone());
            state
                .by_user
                .entry(order.user_id.clone())
                .or_default()
                .push(order.id.clone());
            state.orders.insert(order.id.clone(), order.clone());
            Ok(order)
        })
    }

    fn find(&self, id: OrderId) -> RepoFuture<'_, Option<Order>> {
        Box::pin(async move { Ok(self.orders.read().await.orders.get(&id).cloned()) })
    }

    fn list_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let state = self.orders.read().await;
            Ok(state
                .by_user
                .get(&user_id)
                .into_iter()
                .flatten()
                .rev()
                .filter_map(|id| state.orders.get(id).cloned())
                .collect())
        })
    }

    fn list_all(&self) -> RepoFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let state = self.orders.read().await;
            Ok(state
                .sequence
                .iter()
                .rev()
                .filter_map(|id| state.orders.get(id).cloned())
                .collect())
        })
    }

    fn set_status(&self, id: OrderId, status: OrderStatus) -> RepoFuture<'_, Option<Order>> {
        Box::pin(async move {
            let mut state = self.orders.write().await;
            let Some(order) = state.orders.get_mut(&id) else {
                return Ok(None);
            };
            order.status = status;
            Ok(Some(order.clone()))
        })
    }
}

impl NotificationRepository for MemoryStore {
    fn insert(&self, new: NewNotification) -> RepoFuture<'_, Notification> {
        Box::pin(async move {
            let notification = Notification {
                id: NotificationId::new(fresh_id("notif")),
                user_id: new.user_id,
                title: new.title,
                message: new.message,
                kind: new.kind,
                is_read: false,
                related_order_id: new.related_order_id,
                created_at: new.created_at,
            };
            let mut state = self.notifications.write().await;
            state
                .by_user
                .entry(notification.user_id.clone())
                .or_default()
                .push(notification.id.clone());
            state
                .items
                .insert(notification.id.clone(), notification.clone());
            Ok(notification)
        })
    }

    fn list_for_user(&self, user_id: UserId) -> RepoFuture<'_, Vec<Notification>> {
        Box::pin(async move {
            let state = self.notifications.read().await;
            Ok(state
                .by_user
                .get(&user_id)
                .into_iter()
                .flatten()
                .rev()
                .filter_map(|id| state.items.get(id).cloned())
                .collect())
        })
    }

    fn unread_count(&self, user_id: UserId) -> RepoFuture<'_, u64> {
        Box::pin(async move {
            let state = self.notifications.read().await;
            Ok(state
                .by_user
                .get(&user_id)
                .into_iter()
                .flatten()
                .filter(|id| state.items.get(id).is_some_and(|n| !n.is_read))
                .count() as u64)
        })
    }

    fn mark_read(&self, id: NotificationId) -> RepoFuture<'_, Option<Notification>> {
        Box::pin(async move {
            let mut state = self.notifications.write().await;
            let Some(notification) = state.items.get_mut(&id) else {
                return Ok(None);
            };
            notification.is_read = true;
            Ok(Some(notification.clone()))
        })
    }

    fn mark_all_read(&self, user_id: UserId) -> RepoFuture<'_, bool> {
        Box::pin(async move {
            let mut state = self.notifications.write().await;
            let ids: Vec<NotificationId> = state
                .by_user
                .get(&user_id)
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            let mut changed = false;
            for id in ids {
                if let Some(notification) = state.items.get_mut(&id) {
                    if !notification.is_read {
                        notification.is_read = true;
                        changed = true;
                    }
                }
            }
            Ok(changed)
        })
    }
}
