//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are strings:
//! callers may supply their own, and the store generates `<prefix>_<seq>`
//! when they don't.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `generated()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use stockline_core::define_id;
/// define_id!(WidgetId, "widget");
///
/// let id = WidgetId::generated(7);
/// assert_eq!(id.as_str(), "widget_7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
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
            /// Prefix used for generated IDs of this kind.
            pub const PREFIX: &'static str = $prefix;

            /// Create an ID from any string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create a generated ID from a sequence number.
            #[must_use]
            pub fn generated(sequence: u64) -> Self {
                Self(format!("{}_{}", Self::PREFIX, sequence))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
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
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod");
define_id!(OrderId, "order");
define_id!(CollectionId, "col");
define_id!(SpreadsheetId, "sheet");

impl SpreadsheetId {
    /// Create a new random spreadsheet ID (`sheet_<uuid>`).
    ///
    /// Random rather than time-based so back-to-back creations never collide.
    #[must_use]
    pub fn random() -> Self {
        Self(format!("{}_{}", Self::PREFIX, uuid::Uuid::new_v4().simple()))
    }
}
