//! Payment, contact and complaint forms.
//!
//! Each form logs one record and redirects back to itself with a notice.
//! Blank or malformed fields redirect with `?error=invalid` instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use corner_shop_core::{Complaint, ContactMessage, Email, Payment, Price};

use crate::db::insert_document;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::routes::notice::{Notice, NoticeQuery};
use crate::state::AppState;

// =============================================================================
// Payment
// =============================================================================

/// Payment form data.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub user: String,
    pub amount: String,
    pub method: String,
}

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment.html")]
pub struct PaymentTemplate {
    pub username: Option<String>,
    pub notice: Notice,
}

/// Display the payment form.
pub async fn payment_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    PaymentTemplate {
        username: user.map(|u| u.username),
        notice: query.notice(),
    }
}

/// Log a payment. No gateway is contacted.
#[instrument(skip(state, form), fields(method = %form.method))]
pub async fn submit_payment(
    State(state): State<AppState>,
    Form(form): Form<PaymentForm>,
) -> Result<Redirect> {
    let Ok(amount) = Price::parse(&form.amount) else {
        return Ok(Redirect::to("/payment?error=invalid"));
    };
    if is_blank(&form.user) || is_blank(&form.method) {
        return Ok(Redirect::to("/payment?error=invalid"));
    }

    let payment = Payment {
        user: form.user.trim().to_string(),
        amount,
        method: form.method.trim().to_string(),
        date: Utc::now(),
    };
    let id = insert_document(state.store(), &payment).await?;
    tracing::info!(payment_id = %id, amount = %payment.amount, "Payment logged");

    Ok(Redirect::to("/payment?success=payment"))
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub username: Option<String>,
    pub notice: Notice,
}

/// Display the contact form.
pub async fn contact_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    ContactTemplate {
        username: user.map(|u| u.username),
        notice: query.notice(),
    }
}

/// Log a contact message.
#[instrument(skip(state, form))]
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Redirect> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(Redirect::to("/contact?error=invalid"));
    };
    if is_blank(&form.name) || is_blank(&form.message) {
        return Ok(Redirect::to("/contact?error=invalid"));
    }

    let message = ContactMessage {
        name: form.name.trim().to_string(),
        email,
        message: form.message.trim().to_string(),
        date: Utc::now(),
    };
    let id = insert_document(state.store(), &message).await?;
    tracing::info!(contact_id = %id, "Contact message logged");

    Ok(Redirect::to("/contact?success=message_sent"))
}

// =============================================================================
// Complaints
// =============================================================================

/// Complaint form data.
#[derive(Debug, Deserialize)]
pub struct ComplaintForm {
    pub user: String,
    pub complaint: String,
}

/// Complaints page template.
#[derive(Template, WebTemplate)]
#[template(path = "complaints.html")]
pub struct ComplaintsTemplate {
    pub username: Option<String>,
    pub notice: Notice,
}

/// Display the complaints form.
pub async fn complaints_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    ComplaintsTemplate {
        username: user.map(|u| u.username),
        notice: query.notice(),
    }
}

/// Log a complaint.
#[instrument(skip(state, form))]
pub async fn submit_complaint(
    State(state): State<AppState>,
    Form(form): Form<ComplaintForm>,
) -> Result<Redirect> {
    if is_blank(&form.user) || is_blank(&form.complaint) {
        return Ok(Redirect::to("/complaints?error=invalid"));
    }

    let complaint = Complaint {
        user: form.user.trim().to_string(),
        complaint: form.complaint.trim().to_string(),
        date: Utc::now(),
    };
    let id = insert_document(state.store(), &complaint).await?;
    tracing::info!(complaint_id = %id, "Complaint logged");

    Ok(Redirect::to("/complaints?success=complaint"))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
