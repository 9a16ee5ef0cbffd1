//! Order handlers: checkout and order history.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{OrderId, OrderStatus, Price, UserId};

use crate::db::{CartRepository, OrderRepository, orders::OrderCustomer};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::{Order, OrderItem, order::checkout_snapshot};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    pub status: OrderStatus,
    pub ordered_on: DateTime<Utc>,
}

impl From<Order> for OrderBody {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            items: order.items,
            total_price: order.total_price,
            status: order.status,
            ordered_on: order.ordered_on,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub order: OrderBody,
}

/// `POST /orders/checkout`
///
/// Snapshots the cart into a new order, then clears the cart. The snapshot
/// is the source of truth from here on; later price changes never rewrite
/// it.
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let carts = CartRepository::new(state.pool());

    let mut cart = carts
        .get_by_user(user.id)
        .await?
        .ok_or(AppError::EmptyCart)?;
    let (items, total) = checkout_snapshot(&cart).ok_or(AppError::EmptyCart)?;

    let order = OrderRepository::new(state.pool())
        .create(user.id, &items, total)
        .await?;

    tracing::info!(user_id = %user.id, order_id = %order.id, "Order placed");

    // The order is committed; a failure emptying the cart is not worth
    // failing the checkout over.
    cart.clear();
    if let Err(err) = carts.save(&cart).await {
        tracing::warn!(user_id = %user.id, error = %err, "Failed to clear cart after checkout");
    }

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            message: "Order placed successfully".to_owned(),
            order: order.into(),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderBody>,
}

/// `GET /orders/my-orders`
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OrderListResponse>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    if orders.is_empty() {
        return Err(AppError::NotFound("no orders found".to_owned()));
    }

    Ok(Json(OrderListResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomerBody {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<OrderCustomer> for OrderCustomerBody {
    fn from(customer: OrderCustomer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminOrderBody {
    #[serde(flatten)]
    pub order: OrderBody,
    pub user: OrderCustomerBody,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderListResponse {
    pub orders: Vec<AdminOrderBody>,
}

/// `GET /orders/all-orders`
pub async fn all_orders(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<AdminOrderListResponse>> {
    let orders = OrderRepository::new(state.pool())
        .list_all_with_users()
        .await?;

    Ok(Json(AdminOrderListResponse {
        orders: orders
            .into_iter()
            .map(|(order, customer)| AdminOrderBody {
                order: order.into(),
                user: customer.into(),
            })
            .collect(),
    }))
}
