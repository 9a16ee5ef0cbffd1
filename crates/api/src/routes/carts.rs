//! Shopping cart handlers.
//!
//! Every mutation follows the same shape: load the cart, apply the change
//! in memory (which recomputes the total), then persist items and total in
//! one write. Unit prices are always re-read from the catalog at mutation
//! time, never taken from the request.

use axum::{Json, extract::{Path, State}, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartwheel_core::{CartId, Price, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Cart, CartError, CartItem, Product};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBody {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total_price: Price,
    pub created_at: DateTime<Utc>,
}

impl From<Cart> for CartBody {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items: cart.items,
            total_price: cart.total_price,
            created_at: cart.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartBody,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self { cart: cart.into() }
    }
}

/// `GET /carts/get-cart`
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    Ok(Json(cart.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i64,
}

/// `POST /carts/add-to-cart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartResponse>)> {
    let quantity = positive_quantity(req.quantity)?;
    let product_id = ProductId::new(req.product_id);

    let product = find_product(&state, product_id).await?;

    let carts = CartRepository::new(state.pool());
    let mut cart = carts.get_or_create(user.id).await?;
    cart.add_item(product_id, quantity, product.price)
        .map_err(cart_error)?;
    carts.save(&cart).await?;

    tracing::info!(user_id = %user.id, product_id = %product_id, quantity, "Item added to cart");

    Ok((StatusCode::CREATED, Json(cart.into())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// `PATCH /carts/update-cart-quantity`
///
/// Sets a line's quantity outright. A quantity of zero or less removes the
/// line.
pub async fn update_cart_quantity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = ProductId::new(req.product_id);

    let carts = CartRepository::new(state.pool());
    let mut cart = carts
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    if !cart.has_item(product_id) {
        return Err(AppError::NotFound("product not found in cart".to_owned()));
    }

    // Re-read the product so the line reprices at the current catalog price.
    let product = find_product(&state, product_id).await?;

    cart.set_quantity(product_id, req.quantity, product.price)
        .map_err(cart_error)?;
    carts.save(&cart).await?;

    Ok(Json(cart.into()))
}

/// `PATCH /carts/{product_id}/remove-from-cart`
pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<i32>,
) -> Result<Json<CartResponse>> {
    let product_id = ProductId::new(product_id);

    let carts = CartRepository::new(state.pool());
    let mut cart = carts
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    cart.remove_item(product_id).map_err(cart_error)?;
    carts.save(&cart).await?;

    Ok(Json(cart.into()))
}

/// `PUT /carts/clear-cart`
pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CartResponse>> {
    let carts = CartRepository::new(state.pool());
    let mut cart = carts
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    cart.clear();
    carts.save(&cart).await?;

    Ok(Json(cart.into()))
}

/// Reject non-positive or overlarge quantities before they reach the cart.
fn positive_quantity(raw: i64) -> Result<u32> {
    u32::try_from(raw)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| AppError::Validation("quantity must be a positive integer".to_owned()))
}

// Archived products still resolve here; they are hidden from listings, not
// from carts that already reference them.
async fn find_product(state: &AppState, product_id: ProductId) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))
}

fn cart_error(err: CartError) -> AppError {
    match err {
        CartError::ItemNotFound => AppError::NotFound("product not found in cart".to_owned()),
        CartError::QuantityOverflow => AppError::Validation("quantity too large".to_owned()),
    }
}
