//! Newtype ids for type-safe entity references.
//!
//! Use the `define_id!` macro to create string id wrappers that prevent
//! accidentally passing a store id where an order id is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pedidos_core::define_id;
/// define_id!(TableId);
/// define_id!(WaiterId);
///
/// let table = TableId::new("t-1");
/// let waiter = WaiterId::new("t-1");
///
/// // These are different types, so this won't compile:
/// // let _: TableId = waiter;
/// assert_eq!(table.as_str(), waiter.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID, returning the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(StoreId);

impl OrderId {
    /// Build a time-derived order id from milliseconds since the Unix epoch.
    ///
    /// Ids are the decimal rendering of the timestamp, so they sort the same
    /// way as creation time while they stay the same width.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_serializes_as_plain_string() {
        let id = OrderId::new("1700000000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000000\"");

        let back: OrderId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back.as_str(), "abc");
    }

    #[test]
    fn test_order_id_from_millis() {
        let id = OrderId::from_millis(1_700_000_000_123);
        assert_eq!(id.as_str(), "1700000000123");
    }

    #[test]
    fn test_store_id_display() {
        let store = StoreId::from("loja1");
        assert_eq!(store.to_string(), "loja1");
        assert_eq!(String::from(store), "loja1");
    }
}
