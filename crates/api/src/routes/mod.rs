//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! POST  /users/register                    - Register a new account
//! POST  /users/login                       - Login, returns a bearer token
//! GET   /users/details                     - Current user's profile (auth)
//! PATCH /users/update-password             - Change password (auth)
//! PATCH /users/{id}/set-as-admin           - Promote to admin (admin)
//!
//! # Products
//! GET   /products/active                   - Active products (public)
//! GET   /products/{id}                     - Product by ID (public)
//! POST  /products/search-by-name           - Substring search (public)
//! POST  /products/search-by-price          - Price-range search (public)
//! GET   /products/all                      - Every product (admin)
//! POST  /products                          - Create product (admin)
//! PATCH /products/{id}/update              - Partial update (admin)
//! PATCH /products/{id}/archive             - Soft delete (admin)
//! PATCH /products/{id}/activate            - Undo archive (admin)
//!
//! # Carts (all auth)
//! GET   /carts/get-cart                    - Current user's cart
//! POST  /carts/add-to-cart                 - Add a product
//! PATCH /carts/update-cart-quantity        - Set a line's quantity
//! PATCH /carts/{product_id}/remove-from-cart - Remove a line
//! PUT   /carts/clear-cart                  - Empty the cart
//!
//! # Orders (all auth)
//! POST  /orders/checkout                   - Snapshot cart into an order
//! GET   /orders/my-orders                  - Caller's orders
//! GET   /orders/all-orders                 - Every order (admin)
//! ```

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/details", get(users::details))
        .route("/update-password", patch(users::update_password))
        .route("/{id}/set-as-admin", patch(users::set_as_admin))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create))
        .route("/active", get(products::list_active))
        .route("/all", get(products::list_all))
        .route("/search-by-name", post(products::search_by_name))
        .route("/search-by-price", post(products::search_by_price))
        .route("/{id}", get(products::get_by_id))
        .route("/{id}/update", patch(products::update))
        .route("/{id}/archive", patch(products::archive))
        .route("/{id}/activate", patch(products::activate))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/get-cart", get(carts::get_cart))
        .route("/add-to-cart", post(carts::add_to_cart))
        .route("/update-cart-quantity", patch(carts::update_cart_quantity))
        .route("/{product_id}/remove-from-cart", patch(carts::remove_from_cart))
        .route("/clear-cart", put(carts::clear_cart))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(orders::checkout))
        .route("/my-orders", get(orders::my_orders))
        .route("/all-orders", get(orders::all_orders))
}

/// Create the complete API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/carts", cart_routes())
        .nest("/orders", order_routes())
}
