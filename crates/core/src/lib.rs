//! Corner Shop Core - Shared types and cart logic.
//!
//! This crate provides the types used across all Corner Shop components:
//! - `storefront` - Public-facing shop, cart API and admin overview
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The shopping cart lives here as a plain value so that
//! every cart rule can be exercised without a session store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for record IDs, prices and emails
//! - [`cart`] - The session cart value object and checkout
//! - [`records`] - Documents stored in the record store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod records;
pub mod types;

pub use cart::{Cart, CartAck, CartError, CartItem, CartItemError, GUEST_LABEL};
pub use records::{
    Collection, Complaint, ContactMessage, Document, Order, Payment, Product, UserRecord,
};
pub use types::*;
