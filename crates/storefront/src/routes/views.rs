//! Display models for templates.
//!
//! Prices and dates are formatted here so templates only print strings.

use corner_shop_core::{CartItem, Complaint, ContactMessage, Order, Payment, Product};

use crate::db::Record;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A catalog product card.
#[derive(Debug, Clone)]
pub struct ProductView {
    /// Cart item id for this product.
    pub id: String,
    pub name: String,
    /// Formatted, e.g. `$9.99`.
    pub price: String,
    /// Plain decimal for the add-to-cart payload.
    pub price_value: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<&Record<Product>> for ProductView {
    fn from(record: &Record<Product>) -> Self {
        let product = &record.doc;
        Self {
            id: record.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            price_value: product.price.amount().to_string(),
            description: product.description.clone(),
            image_url: (!product.image.is_empty()).then(|| format!("/uploads/{}", product.image)),
        }
    }
}

/// One line of a cart or order.
#[derive(Debug, Clone)]
pub struct LineView {
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartItem> for LineView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            qty: item.qty(),
            price: item.price().to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub user: String,
    pub date: String,
    pub total: String,
    pub lines: Vec<LineView>,
}

impl From<&Record<Order>> for OrderView {
    fn from(record: &Record<Order>) -> Self {
        let order = &record.doc;
        Self {
            id: record.id.to_string(),
            user: order.user.clone(),
            date: order.date.format(DATE_FORMAT).to_string(),
            total: order.total.to_string(),
            lines: order.products.iter().map(LineView::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentView {
    pub user: String,
    pub amount: String,
    pub method: String,
    pub date: String,
}

impl From<&Record<Payment>> for PaymentView {
    fn from(record: &Record<Payment>) -> Self {
        let payment = &record.doc;
        Self {
            user: payment.user.clone(),
            amount: payment.amount.to_string(),
            method: payment.method.clone(),
            date: payment.date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactView {
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: String,
}

impl From<&Record<ContactMessage>> for ContactView {
    fn from(record: &Record<ContactMessage>) -> Self {
        let contact = &record.doc;
        Self {
            name: contact.name.clone(),
            email: contact.email.to_string(),
            message: contact.message.clone(),
            date: contact.date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComplaintView {
    pub user: String,
    pub complaint: String,
    pub date: String,
}

impl From<&Record<Complaint>> for ComplaintView {
    fn from(record: &Record<Complaint>) -> Self {
        let complaint = &record.doc;
        Self {
            user: complaint.user.clone(),
            complaint: complaint.complaint.clone(),
            date: complaint.date.format(DATE_FORMAT).to_string(),
        }
    }
}
