//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use corner_shop_core::Order;

use crate::db::{FindQuery, SortDirection, find_documents};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::routes::views::OrderView;
use crate::state::AppState;

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub username: Option<String>,
    pub orders: Vec<OrderView>,
}

/// Query for every order, newest first.
pub(crate) fn newest_first() -> FindQuery {
    FindQuery::all().sort_by("date", SortDirection::Descending)
}

/// Display all orders, newest first.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<OrdersTemplate> {
    let orders = find_documents::<Order>(state.store(), &newest_first()).await?;
    Ok(OrdersTemplate {
        username: user.map(|u| u.username),
        orders: orders.iter().map(OrderView::from).collect(),
    })
}
