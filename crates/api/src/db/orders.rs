//! Order repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use cartwheel_core::{Email, OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, items, total_price, status, ordered_on";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    items: Json<Vec<OrderItem>>,
    total_price: Price,
    status: OrderStatus,
    ordered_on: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            total_price: row.total_price,
            status: row.status,
            ordered_on: row.ordered_on,
        }
    }
}

/// Display fields of the user owning an order, for the admin listing.
#[derive(Debug, Clone)]
pub struct OrderCustomer {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order snapshot with status `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total_price: Price,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, items, total_price)
             VALUES ($1, $2, $3)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(Json(items))
        .bind(total_price)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY ordered_on DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List every order with the owning user's display fields resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list_all_with_users(
        &self,
    ) -> Result<Vec<(Order, OrderCustomer)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct OrderWithUserRow {
            #[sqlx(flatten)]
            order: OrderRow,
            user_first_name: String,
            user_last_name: String,
            user_email: String,
        }

        let rows = sqlx::query_as::<_, OrderWithUserRow>(
            "SELECT o.id, o.user_id, o.items, o.total_price, o.status, o.ordered_on,
                    u.first_name AS user_first_name,
                    u.last_name AS user_last_name,
                    u.email AS user_email
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.ordered_on DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for r in rows {
            let email = Email::parse(&r.user_email).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;
            let customer = OrderCustomer {
                id: r.order.user_id,
                first_name: r.user_first_name,
                last_name: r.user_last_name,
                email,
            };
            orders.push((r.order.into(), customer));
        }

        Ok(orders)
    }
}
