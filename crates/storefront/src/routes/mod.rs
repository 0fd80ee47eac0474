//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with the catalog
//! GET  /about                  - About page
//! GET  /services               - Services page
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /add_products           - Product entry form
//! POST /add_products           - Store a product (multipart, optional image)
//!
//! # Cart (JSON)
//! GET  /cart                   - Cart page
//! POST /add_to_cart            - Add an item or merge its quantity
//! GET  /cart_data              - Cart lines
//! POST /update_cart            - Set a line's quantity
//! POST /remove_from_cart       - Remove a line
//! POST /place_order            - Check out
//!
//! # Orders and forms
//! GET  /orders                 - Orders, newest first
//! GET  /payment, POST /payment - Log a payment
//! GET  /contact, POST /contact - Log a contact message
//! GET  /complaints, POST /complaints - Log a complaint
//! GET  /admin                  - Every stored record
//!
//! # Auth
//! GET  /login, POST /login     - Password login
//! GET  /register, POST /register - Create an account
//! GET  /logout, POST /logout   - Clear the session
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod notice;
pub mod orders;
pub mod pages;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add_to_cart", post(cart::add))
        .route("/cart_data", get(cart::data))
        .route("/update_cart", post(cart::update))
        .route("/remove_from_cart", post(cart::remove))
        .route("/place_order", post(cart::place_order))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::home))
        .route("/products", get(catalog::index))
        .route(
            "/add_products",
            get(catalog::new_product).post(catalog::create_product),
        )
}

/// Create the form routes router.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/payment",
            get(contact::payment_page).post(contact::submit_payment),
        )
        .route(
            "/contact",
            get(contact::contact_page).post(contact::submit_contact),
        )
        .route(
            "/complaints",
            get(contact::complaints_page).post(contact::submit_complaint),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(cart_routes())
        .merge(form_routes())
        .merge(auth_routes())
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/orders", get(orders::index))
        .route("/admin", get(admin::index))
}
