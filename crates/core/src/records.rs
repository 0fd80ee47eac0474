//! Documents kept in the record store.
//!
//! Each type maps to one named collection through [`Document`]. Documents
//! are stored as JSON, so the serde shape of these structs is the storage
//! format.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{Email, Price};

/// A named collection in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Products,
    Orders,
    Payments,
    Contacts,
    Complaints,
}

impl Collection {
    /// All collections, in admin display order.
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Products,
        Self::Orders,
        Self::Payments,
        Self::Contacts,
        Self::Complaints,
    ];

    /// The collection name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Payments => "payments",
            Self::Contacts => "contacts",
            Self::Complaints => "complaints",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type stored in one collection of the record store.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection this document lives in.
    const COLLECTION: Collection;
}

/// A registered shop account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: Email,
    /// PHC-format password hash.
    pub password: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Document for UserRecord {
    const COLLECTION: Collection = Collection::Users;
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Price,
    pub description: String,
    /// File name inside the upload directory, empty when no image was given.
    #[serde(default)]
    pub image: String,
}

impl Document for Product {
    const COLLECTION: Collection = Collection::Products;
}

/// A placed order: a frozen copy of the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub user: String,
    pub products: Vec<CartItem>,
    pub total: Price,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
}

impl Document for Order {
    const COLLECTION: Collection = Collection::Orders;
}

/// A logged payment. No gateway is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub user: String,
    pub amount: Price,
    pub method: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
}

impl Document for Payment {
    const COLLECTION: Collection = Collection::Payments;
}

/// A message from the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub message: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
}

impl Document for ContactMessage {
    const COLLECTION: Collection = Collection::Contacts;
}

/// A customer complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub user: String,
    pub complaint: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
}

impl Document for Complaint {
    const COLLECTION: Collection = Collection::Complaints;
}

/// Fixed-width UTC timestamps so that stored dates sort as plain strings.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339 with exactly six fractional digits.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Deserialize any RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not RFC 3339.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let early = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let late = early + chrono::Duration::milliseconds(500);

        let a = serde_json::to_value(Complaint {
            user: "u".into(),
            complaint: "c".into(),
            date: early,
        })
        .unwrap();
        let b = serde_json::to_value(Complaint {
            user: "u".into(),
            complaint: "c".into(),
            date: late,
        })
        .unwrap();

        assert_eq!(a["date"], "2026-01-02T03:04:05.000000Z");
        assert!(a["date"].as_str().unwrap() < b["date"].as_str().unwrap());
    }

    #[test]
    fn test_order_round_trips_through_json() {
        let order = Order {
            user: "Guest".into(),
            products: vec![CartItem::new("p1", "Widget", Price::parse("2.5").unwrap(), 2).unwrap()],
            total: Price::parse("5").unwrap(),
            date: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["products"][0]["name"], "Widget");

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_collection_names() {
        let names: Vec<_> = Collection::ALL.iter().map(Collection::as_str).collect();
        assert_eq!(
            names,
            ["users", "products", "orders", "payments", "contacts", "complaints"]
        );
    }
}
