//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProductId` where a `CompanyId` is expected.
//! Rows use database-assigned 64-bit keys, so every ID wraps an `i64`.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw database key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company (parent or branch).");
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(SupplierId, "Unique identifier for a supplier.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(ProductGroupId, "Unique identifier for a product group.");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(TreasuryId, "Unique identifier for a treasury (cash box or bank account).");
typed_id!(ProjectId, "Unique identifier for a project.");
typed_id!(ProjectExpenseId, "Unique identifier for a project expense line.");
typed_id!(ExternalStoreId, "Unique identifier for an external store.");
typed_id!(LedgerEntryId, "Unique identifier for a party account entry.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_roundtrip_raw() {
        let id = CompanyId::new(42);
        assert_eq!(id.into_inner(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(CompanyId::from(42), id);
    }

    #[test]
    fn test_typed_id_display() {
        assert_eq!(ProductId::new(7).to_string(), "7");
    }

    #[test]
    fn test_typed_id_from_str() {
        assert_eq!(EmployeeId::from_str("15").unwrap(), EmployeeId::new(15));
        assert!(EmployeeId::from_str("abc").is_err());
    }

    #[test]
    fn test_typed_id_ordering() {
        assert!(ProjectId::new(1) < ProjectId::new(2));
    }
}
