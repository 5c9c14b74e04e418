// storefront_server/src/lib.rs

//! HTTP surface of the storefront: auth, catalog management, cart and
//! checkout, the order lifecycle and the admin dispute desk.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;
