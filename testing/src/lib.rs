//! # Tez Market Testing
//!
//! Deterministic test support shared across the workspace:
//!
//! - Mock implementations of environment traits ([`mocks::FixedClock`])
//! - Fixture builders for common domain values
//!
//! ## Example
//!
//! ```
//! use tezmarket_testing::test_clock;
//! use tezmarket_core::environment::Clock;
//!
//! let clock = test_clock();
//! assert_eq!(clock.now(), clock.now());
//! ```

use chrono::{DateTime, Utc};
use tezmarket_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making timestamps reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Creates a fixed clock pinned to the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// The default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Fixture builders for common domain values.
pub mod fixtures {
    use tezmarket_core::repository::{NewCartItem, NewProduct};
    use tezmarket_core::types::{Money, ProductId, UserId};

    /// An orderable product with the given name and decimal price string.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a valid decimal amount; fixtures are
    /// test-only and fail loudly.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn product(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price: price.parse::<Money>().expect("fixture price should parse"),
            weight: None,
            image_url: None,
            category_id: None,
            in_stock: true,
            is_popular: false,
        }
    }

    /// A cart row request for the given user/product pair.
    #[must_use]
    pub fn cart_item(user_id: &str, product_id: &str, quantity: u32) -> NewCartItem {
        NewCartItem {
            user_id: UserId::new(user_id),
            product_id: Some(ProductId::new(product_id)),
            quantity,
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn product_fixture_parses_price() {
        let product = fixtures::product("Хлеб", "89.00");
        assert_eq!(product.price.cents(), 8900);
    }
}
