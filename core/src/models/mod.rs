// storefront/src/models/mod.rs

//! Documents held in the four top-level collections (`users`, `stores`,
//! `products`, `orders`). Field names serialize in camelCase.

pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use order::{DisputeOutcome, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, Product, ProductUpdate};
pub use store::{NewStore, Store, StoreLayout, StoreStatus, StoreUpdate};
pub use user::{Credential, Role, User};
