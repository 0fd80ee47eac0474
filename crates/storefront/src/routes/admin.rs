//! Admin overview.
//!
//! One page listing every collection except users. There is no login.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use corner_shop_core::{Complaint, ContactMessage, Order, Payment, Product};

use crate::db::{FindQuery, find_documents};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::routes::orders::newest_first;
use crate::routes::views::{ComplaintView, ContactView, OrderView, PaymentView, ProductView};
use crate::state::AppState;

/// Admin page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub username: Option<String>,
    pub products: Vec<ProductView>,
    pub orders: Vec<OrderView>,
    pub payments: Vec<PaymentView>,
    pub contacts: Vec<ContactView>,
    pub complaints: Vec<ComplaintView>,
}

/// Display every stored record.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<AdminTemplate> {
    let store = state.store();
    let all = FindQuery::all();

    let products = find_documents::<Product>(store, &all).await?;
    let orders = find_documents::<Order>(store, &newest_first()).await?;
    let payments = find_documents::<Payment>(store, &all).await?;
    let contacts = find_documents::<ContactMessage>(store, &all).await?;
    let complaints = find_documents::<Complaint>(store, &all).await?;

    Ok(AdminTemplate {
        username: user.map(|u| u.username),
        products: products.iter().map(ProductView::from).collect(),
        orders: orders.iter().map(OrderView::from).collect(),
        payments: payments.iter().map(PaymentView::from).collect(),
        contacts: contacts.iter().map(ContactView::from).collect(),
        complaints: complaints.iter().map(ComplaintView::from).collect(),
    })
}
