//! Domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. All cart and order arithmetic lives here, free of I/O, so the
//! invariants can be tested without a database.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartError, CartItem};
pub use order::{Order, OrderItem};
pub use product::{Product, ProductPatch};
pub use user::User;
