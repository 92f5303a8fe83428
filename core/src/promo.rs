//! Static promo-code registry.
//!
//! Promo codes are configuration data, not stored entities: the registry is
//! built once at startup (and can be rebuilt from fresh configuration
//! without touching the rest of the system). Matching is case-insensitive
//! - the shipped codes are uppercase Cyrillic - and an inactive code
//! resolves exactly like an unknown one, so callers cannot tell which codes
//! exist.

/// A percentage discount unlocked by a code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromoCode {
    /// The code as printed in marketing material.
    pub code: String,
    /// Discount percentage, 0..=100.
    pub discount_percent: u8,
    /// Marketing description.
    pub description: String,
    /// Inactive codes resolve to nothing.
    pub is_active: bool,
}

impl PromoCode {
    /// Creates a registry entry. Percentages above 100 are capped.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        discount_percent: u8,
        description: impl Into<String>,
        is_active: bool,
    ) -> Self {
        Self {
            code: code.into(),
            discount_percent: discount_percent.min(100),
            description: description.into(),
            is_active,
        }
    }
}

/// The fixed set of promo codes known to the system.
#[derive(Clone, Debug)]
pub struct PromoRegistry {
    codes: Vec<PromoCode>,
}

impl PromoRegistry {
    /// Builds a registry from explicit configuration.
    #[must_use]
    pub fn new(codes: Vec<PromoCode>) -> Self {
        Self { codes }
    }

    /// The shipped registry: the three marketing codes currently running.
    #[must_use]
    pub fn with_default_codes() -> Self {
        Self::new(vec![
            PromoCode::new("ПЕРВЫЙ", 20, "Скидка 20% на первый заказ", true),
            PromoCode::new("ДРУЗЬЯМ", 15, "Скидка 15% для друзей", true),
            PromoCode::new("ЛЕТОМ", 10, "Летняя скидка 10%", true),
        ])
    }

    /// Resolves a code to its discount.
    ///
    /// Matching ignores case and surrounding whitespace. Returns `None` for
    /// unknown *and* inactive codes - callers must not be able to
    /// distinguish the two.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<&PromoCode> {
        let wanted = code.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }
        self.codes
            .iter()
            .find(|entry| entry.is_active && entry.code.to_uppercase() == wanted)
    }
}

impl Default for PromoRegistry {
    fn default() -> Self {
        Self::with_default_codes()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_code() {
        let registry = PromoRegistry::with_default_codes();
        let promo = registry.resolve("ПЕРВЫЙ").unwrap();
        assert_eq!(promo.discount_percent, 20);
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let registry = PromoRegistry::with_default_codes();
        assert!(registry.resolve("первый").is_some());
        assert!(registry.resolve("  друзьям ").is_some());
        assert!(registry.resolve("Летом").is_some());
    }

    #[test]
    fn unknown_code_resolves_to_none() {
        let registry = PromoRegistry::with_default_codes();
        assert!(registry.resolve("ЗИМОЙ").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn inactive_code_is_indistinguishable_from_unknown() {
        let registry = PromoRegistry::new(vec![PromoCode::new(
            "СТАРЫЙ",
            30,
            "Истекшая акция",
            false,
        )]);
        assert!(registry.resolve("СТАРЫЙ").is_none());
    }

    #[test]
    fn percent_is_capped_at_100() {
        let promo = PromoCode::new("ВСЁ", 150, "", true);
        assert_eq!(promo.discount_percent, 100);
    }
}
