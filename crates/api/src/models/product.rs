//! Product domain types.

use chrono::{DateTime, Utc};

use cartwheel_core::{Price, ProductId};

/// A catalog product (domain type).
///
/// Products are never hard-deleted: archiving flips `is_active`, which hides
/// the product from public listings while keeping it available for orders
/// that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Current unit price.
    pub price: Price,
    /// Whether the product appears in public listings.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Partial update for a product.
///
/// Only supplied, non-empty fields overwrite; an empty name or description
/// and a zero price fall back to the existing value, so a client sending a
/// sparse body never blanks out data.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

impl Product {
    /// Whether setting the active flag to `desired` changes anything.
    ///
    /// Archive and activate are idempotent: when this returns `false` the
    /// caller skips the write and returns the current state unchanged.
    #[must_use]
    pub const fn needs_active_update(&self, desired: bool) -> bool {
        self.is_active != desired
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name
            && !name.is_empty()
        {
            self.name = name;
        }
        if let Some(description) = patch.description
            && !description.is_empty()
        {
            self.description = description;
        }
        if let Some(price) = patch.price
            && !price.is_zero()
        {
            self.price = price;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Coffee".to_owned(),
            description: "Whole bean".to_owned(),
            price: Price::new(Decimal::new(1250, 2)).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_repeated_archive_is_idempotent() {
        let mut p = product();
        assert!(p.needs_active_update(false));

        p.is_active = false;
        let archived = p.clone();

        // Re-archiving changes nothing; re-activating does.
        assert!(!p.needs_active_update(false));
        assert_eq!(p, archived);
        assert!(p.needs_active_update(true));
    }

    #[test]
    fn test_apply_overwrites_supplied_fields() {
        let mut p = product();
        p.apply(ProductPatch {
            name: Some("Espresso".to_owned()),
            description: None,
            price: Some(Price::new(Decimal::new(1400, 2)).unwrap()),
        });
        assert_eq!(p.name, "Espresso");
        assert_eq!(p.description, "Whole bean");
        assert_eq!(p.price, Price::new(Decimal::new(1400, 2)).unwrap());
    }

    #[test]
    fn test_apply_falsy_values_fall_back_to_existing() {
        let mut p = product();
        let before = p.clone();
        p.apply(ProductPatch {
            name: Some(String::new()),
            description: Some(String::new()),
            price: Some(Price::ZERO),
        });
        assert_eq!(p, before);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let mut p = product();
        let before = p.clone();
        p.apply(ProductPatch::default());
        assert_eq!(p, before);
    }
}
