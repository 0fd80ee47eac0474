//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `cart` - Loads the session cart, applies an operation, writes it back
//! - `uploads` - Product image storage

pub mod auth;
pub mod cart;
pub mod uploads;

pub use cart::{CartSession, CartSessionError};
