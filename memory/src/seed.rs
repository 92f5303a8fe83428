//! Explicit demo-data bootstrap.
//!
//! Seeding is a deliberate step called from `main` (or a test), never a
//! construction side effect, so a deployment backed by a real database can
//! skip it without touching anything else.

use crate::MemoryStore;
use tezmarket_core::environment::Clock;
use tezmarket_core::error::StorageError;
use tezmarket_core::repository::{
    CategoryRepository, NewCategory, NewNotification, NewProduct, NotificationRepository,
    ProductRepository,
};
use tezmarket_core::types::{Money, NotificationKind, UserId};

/// The demo identity every fresh deployment knows about.
pub const DEMO_USER_ID: &str = "demo-user";

/// Loads the demo catalog, and a welcome feed for [`DEMO_USER_ID`].
///
/// # Errors
///
/// Propagates storage failures; the in-memory backend never produces any.
pub async fn seed_demo_data(store: &MemoryStore, clock: &dyn Clock) -> Result<(), StorageError> {
    let categories = [
        ("Овощи и фрукты", "vegetables", 1),
        ("Молочные продукты", "dairy", 2),
        ("Мясо и рыба", "meat", 3),
        ("Снеки и напитки", "snacks", 4),
        ("Готовые блюда", "ready-meals", 5),
        ("Хлеб и выпечка", "bakery", 6),
        ("Крупы и макароны", "cereals", 7),
        ("Консервы", "canned", 8),
        ("Сладости", "sweets", 9),
        ("Замороженные продукты", "frozen", 10),
    ];

    let mut slug_to_id = std::collections::HashMap::new();
    for (name, slug, sort_order) in categories {
        let category = CategoryRepository::insert(
            store,
            NewCategory {
                name: name.to_string(),
                slug: slug.to_string(),
                image_url: None,
                sort_order,
            },
        )
        .await?;
        slug_to_id.insert(slug, category.id);
    }

    let products = [
        (
            "Хлеб Бородинский",
            "Ржаной хлеб",
            Money::from_cents(8900),
            "500г",
            "bakery",
        ),
        (
            "Молоко Простоквашино 3.2%",
            "Натуральное молоко",
            Money::from_cents(7500),
            "930мл",
            "dairy",
        ),
        (
            "Плов Душанбинский",
            "Готовый плов по-таджикски",
            Money::from_cents(35000),
            "400г",
            "ready-meals",
        ),
        (
            "Яблоки Гала",
            "Сладкие красные яблоки",
            Money::from_cents(15900),
            "1кг",
            "vegetables",
        ),
    ];

    for (name, description, price, weight, category_slug) in products {
        ProductRepository::insert(
            store,
            NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price,
                weight: Some(weight.to_string()),
                image_url: None,
                category_id: slug_to_id.get(category_slug).cloned(),
                in_stock: true,
                is_popular: true,
            },
        )
        .await?;
    }

    let demo_user = UserId::new(DEMO_USER_ID);
    let welcome = [
        (
            "Скидка на первый заказ",
            "Используйте промокод ПЕРВЫЙ при оформлении заказа и получите скидку 20%",
        ),
        (
            "Новые продукты в каталоге",
            "Добавили свежие фрукты и овощи. Оформите заказ до 23:00 для доставки сегодня",
        ),
    ];
    for (title, message) in welcome {
        NotificationRepository::insert(
            store,
            NewNotification {
                user_id: demo_user.clone(),
                title: title.to_string(),
                message: message.to_string(),
                kind: NotificationKind::Info,
                related_order_id: None,
                created_at: clock.now(),
            },
        )
        .await?;
    }

    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        "seeded demo data"
    );
    Ok(())
}
