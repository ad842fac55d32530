//! Velora Core - Domain types and cart state container.
//!
//! This crate provides the types shared across all Velora Beauty components:
//! - `storefront` - Public store and admin JSON API
//! - `cli` - Command-line tools for seeding and base management
//!
//! # Architecture
//!
//! The core crate contains only types and the in-memory cart store - no I/O,
//! no HTTP clients, no async. The cart persists through an injected blob-slot
//! port ([`cart::CartStorage`]) so it can be unit-tested with an in-memory
//! fake and backed by a file (or anything else) in production.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, orders, statuses, shipping/payment methods
//! - [`cart`] - The cart state container and its persistence port

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CART_STORAGE_KEY, Cart, CartLine, CartStorage, CartStore, MemoryCartStorage};
pub use types::*;
