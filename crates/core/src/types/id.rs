//! Newtype IDs for type-safe record references.
//!
//! Every document in the record store gets a `BIGSERIAL` id. The
//! `define_id!` macro wraps that number per collection so an order id can't
//! be handed to something expecting a user id.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>` and `From<RecordId>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature),
///   so record store queries bind and fetch ids directly
///
/// # Example
///
/// ```rust
/// # use corner_shop_core::define_id;
/// define_id!(InvoiceId);
///
/// let id = InvoiceId::new(7);
/// assert_eq!(id.as_i64(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Collection-agnostic id handed out by the record store.
define_id!(RecordId);

define_id!(UserId);
define_id!(OrderId);

macro_rules! from_record_id {
    ($($name:ident),+) => {
        $(
            impl From<RecordId> for $name {
                fn from(id: RecordId) -> Self {
                    Self(id.as_i64())
                }
            }
        )+
    };
}

from_record_id!(UserId, OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_converts_to_typed_id() {
        let record = RecordId::new(42);
        let order = OrderId::from(record);
        assert_eq!(order.as_i64(), 42);
        assert_eq!(order.to_string(), "42");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = UserId::new(9);
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("9"));
    }
}
