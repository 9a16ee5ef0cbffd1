//! Product catalog handlers.
//!
//! Reads are public; writes require admin. Deleting is soft: `archive`
//! hides a product from public listings and `activate` brings it back.

use axum::{Json, extract::{Path, State}, http::StatusCode};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{Price, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductPatch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            is_active: product.is_active,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: ProductBody,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductBody>,
}

fn product_list(products: Vec<Product>) -> Json<ProductListResponse> {
    Json(ProductListResponse {
        products: products.into_iter().map(Into::into).collect(),
    })
}

/// `GET /products/active`
pub async fn list_active(State(state): State<AppState>) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool()).list_active().await?;
    Ok(product_list(products))
}

/// `GET /products/all`
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(product_list(products))
}

/// `GET /products/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(ProductResponse {
        product: product.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let price = parse_price(req.price.unwrap_or_default())?;

    let product = ProductRepository::new(state.pool())
        .create(&req.name, &req.description, price)
        .await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            product: product.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// `PATCH /products/{id}/update`
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let repo = ProductRepository::new(state.pool());

    let mut product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    product.apply(ProductPatch {
        name: req.name,
        description: req.description,
        price: req.price.map(parse_price).transpose()?,
    });

    repo.update(&product).await?;

    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(ProductResponse {
        product: product.into(),
    }))
}

/// `PATCH /products/{id}/archive`
pub async fn archive(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    set_active_state(&state, ProductId::new(id), false).await
}

/// `PATCH /products/{id}/activate`
pub async fn activate(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    set_active_state(&state, ProductId::new(id), true).await
}

/// Flip a product's active flag. Idempotent: a product already in the
/// requested state is returned unchanged.
async fn set_active_state(
    state: &AppState,
    id: ProductId,
    is_active: bool,
) -> Result<Json<ProductResponse>> {
    let repo = ProductRepository::new(state.pool());

    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    let product = if current.needs_active_update(is_active) {
        let updated = repo.set_active(id, is_active).await?;
        tracing::info!(product_id = %id, is_active, "Product active flag changed");
        updated
    } else {
        current
    };

    Ok(Json(ProductResponse {
        product: product.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchByNameRequest {
    #[serde(default)]
    pub name: String,
}

/// `POST /products/search-by-name`
pub async fn search_by_name(
    State(state): State<AppState>,
    Json(req): Json<SearchByNameRequest>,
) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool())
        .search_by_name(&req.name)
        .await?;
    Ok(product_list(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchByPriceRequest {
    pub min_price: Decimal,
    pub max_price: Decimal,
}

/// `POST /products/search-by-price`
pub async fn search_by_price(
    State(state): State<AppState>,
    Json(req): Json<SearchByPriceRequest>,
) -> Result<Json<ProductListResponse>> {
    let min = parse_price(req.min_price)?;
    let max = parse_price(req.max_price)?;
    if min > max {
        return Err(AppError::Validation(
            "minPrice must not exceed maxPrice".to_owned(),
        ));
    }

    let products = ProductRepository::new(state.pool())
        .search_by_price(min, max)
        .await?;
    Ok(product_list(products))
}

fn parse_price(value: Decimal) -> Result<Price> {
    Price::new(value).map_err(|e| AppError::Validation(e.to_string()))
}
