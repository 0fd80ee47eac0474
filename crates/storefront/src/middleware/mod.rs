//! HTTP middleware and extractors for storefront.
//!
//! # Middleware
//!
//! - `request_id` - Tags every request with an `x-request-id`
//! - `security_headers` - Adds browser hardening headers to responses
//! - `session` - Signed-cookie session layer
//! - `auth` - Current-user extractor and session helpers
//! - `json` - JSON extractor that answers bad payloads with 400

pub mod auth;
pub mod json;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, clear_session, set_current_user};
pub use json::ValidatedJson;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
