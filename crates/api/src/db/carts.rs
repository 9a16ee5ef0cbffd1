//! Cart repository for database operations.
//!
//! A cart is one row per user with its items held in a JSONB column, so
//! every save is a single-row UPDATE: the items and the recomputed total
//! change together or not at all.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use cartwheel_core::{CartId, Price, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

const CART_COLUMNS: &str = "id, user_id, items, total_price, created_at";

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    items: Json<Vec<CartItem>>,
    total_price: Price,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            total_price: row.total_price,
            created_at: row.created_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a user's cart, creating an empty one if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // DO UPDATE instead of DO NOTHING so RETURNING always yields the row.
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO carts (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Persist a cart's items and total in a single-row write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart row no longer exists.
    pub async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE carts SET items = $2, total_price = $3 WHERE id = $1")
            .bind(cart.id)
            .bind(Json(&cart.items))
            .bind(cart.total_price)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
