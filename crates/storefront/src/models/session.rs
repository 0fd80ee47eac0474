//! Session-related types.
//!
//! Types stored in the visitor's session.

use serde::{Deserialize, Serialize};

use corner_shop_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's record ID.
    pub user_id: UserId,
    /// Display name, also recorded on orders.
    pub username: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's cart lines.
    pub const CART: &str = "cart";
}
