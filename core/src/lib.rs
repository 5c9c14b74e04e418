// storefront/src/lib.rs

//! Storefront: a multi-vendor marketplace core.
//!
//! Sellers run stores and list products, buyers fill a cart that may span
//! several stores, and checkout turns it into one order per store. Orders
//! then move through a small state machine, closed by the buyer's delivery
//! claim; non-delivery claims surface as disputes an admin resolves.
//!
//!  - [`cart`] and [`checkout`]: the session cart and the per-store split.
//!  - [`lifecycle`] and [`dispute`]: order status rules and admin resolution.
//!  - [`catalog`]: the observable mirror over a pluggable [`catalog::DocumentStore`].
//!  - [`access`]: role gating for the client routes.
//!  - [`workflow`]: the async step pipeline the server composes operations from.

pub mod access;
pub mod blob;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dispute;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod stats;
pub mod workflow;

pub use crate::access::{authorize, Access, Route};
pub use crate::blob::{AssetFolder, BlobStore, DataUrl, FsBlobStore, MemoryBlobStore};
pub use crate::cart::{Cart, CartLine};
pub use crate::catalog::{Catalog, DocumentStore, MemoryDocumentStore};
pub use crate::checkout::{build_orders, split_cart, CheckoutSummary, ContactDetails, QuantityOverrides, StoreGroup};
pub use crate::error::{StorefrontError, StorefrontResult};
pub use crate::lifecycle::{BuyerClaim, TransitionPolicy};
pub use crate::stats::{AdminStats, BuyerSummary, SellerSummary};
pub use crate::workflow::{ContextData, Pipeline, PipelineControl, PipelineResult, WorkflowError};
