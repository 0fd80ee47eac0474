//! Cart route handlers.
//!
//! The JSON endpoints drive `static/js/cart.js`; the `/cart` page renders
//! the same session cart server-side. Every handler loads the cart from the
//! session, applies one operation and saves it back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use corner_shop_core::{CartItem, Price};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{OptionalAuth, ValidatedJson};
use crate::routes::views::LineView;
use crate::services::CartSession;
use crate::state::AppState;

/// Body of `POST /add_to_cart`.
///
/// `name` and `price` may be omitted when the id is already in the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default = "default_qty")]
    pub qty: i64,
}

const fn default_qty() -> i64 {
    1
}

/// Body of `POST /update_cart`.
#[derive(Debug, Deserialize)]
pub struct UpdateCartPayload {
    pub id: String,
    pub qty: i64,
}

/// Body of `POST /remove_from_cart`.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartPayload {
    pub id: String,
}

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl ToString) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub username: Option<String>,
    pub lines: Vec<LineView>,
    pub total: String,
    pub item_count: u32,
}

/// Display the cart page.
#[instrument(skip(session, user))]
pub async fn show(session: Session, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    let cart = CartSession::new(&session).load().await;

    CartTemplate {
        username: user.map(|u| u.username),
        lines: cart.items().iter().map(LineView::from).collect(),
        total: cart.total().to_string(),
        item_count: cart.item_count(),
    }
}

/// Add an item, or merge its quantity into the existing line.
#[instrument(skip(session, payload), fields(item_id = %payload.id, qty = payload.qty))]
pub async fn add(
    session: Session,
    ValidatedJson(payload): ValidatedJson<AddToCartPayload>,
) -> Result<Json<MessageResponse>> {
    let qty = u32::try_from(payload.qty)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::Validation("qty must be at least 1".to_string()))?;

    let cart = CartSession::new(&session);
    let ack = match (payload.name, payload.price) {
        (Some(name), Some(price)) => {
            let item = CartItem::new(payload.id, name, price, qty)?;
            cart.try_update(|c| c.add(item)).await?
        }
        (None, None) => cart.try_update(|c| c.add_quantity(&payload.id, qty)).await?,
        (Some(_), None) => return Err(AppError::Validation("price is required".to_string())),
        (None, Some(_)) => return Err(AppError::Validation("name is required".to_string())),
    };

    add_breadcrumb("cart", &ack.to_string(), None);
    Ok(MessageResponse::new(ack))
}

/// The cart's lines as JSON.
#[instrument(skip(session))]
pub async fn data(session: Session) -> Json<Vec<CartItem>> {
    let cart = CartSession::new(&session).load().await;
    Json(cart.items().to_vec())
}

/// Set a line's quantity (values below 1 become 1).
#[instrument(skip(session, payload), fields(item_id = %payload.id, qty = payload.qty))]
pub async fn update(
    session: Session,
    ValidatedJson(payload): ValidatedJson<UpdateCartPayload>,
) -> Result<Json<MessageResponse>> {
    let ack = CartSession::new(&session)
        .try_update(|c| c.set_quantity(&payload.id, payload.qty))
        .await?;
    Ok(MessageResponse::new(ack))
}

/// Remove a line.
#[instrument(skip(session, payload), fields(item_id = %payload.id))]
pub async fn remove(
    session: Session,
    ValidatedJson(payload): ValidatedJson<RemoveFromCartPayload>,
) -> Result<Json<MessageResponse>> {
    let ack = CartSession::new(&session)
        .update(|c| c.remove(&payload.id))
        .await?;
    Ok(MessageResponse::new(ack))
}

/// Check out: store the order, then empty the cart.
#[instrument(skip(state, session, user))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<MessageResponse>> {
    let order_id = CartSession::new(&session)
        .checkout(state.store(), user.as_ref())
        .await?;

    let order_ref = order_id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_ref.as_str())]));
    Ok(MessageResponse::new(format!(
        "Order #{order_id} placed successfully!"
    )))
}
