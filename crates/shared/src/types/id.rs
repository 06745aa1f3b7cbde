//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ChurchId` where a `FundId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for an authenticated actor.");
typed_id!(ChurchId, "Unique identifier for a church (tenant).");
typed_id!(FundId, "Unique identifier for a fund.");
typed_id!(LedgerId, "Unique identifier for a monthly ledger period.");
typed_id!(EntryId, "Unique identifier for an accounting entry.");
typed_id!(ExpenseId, "Unique identifier for an expense record.");
typed_id!(ReportId, "Unique identifier for a monthly report.");
typed_id!(FundEventId, "Unique identifier for a fund event.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_unique() {
        let a = ChurchId::new();
        let b = ChurchId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_roundtrip() {
        let id = FundId::new();
        let parsed = FundId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ReportId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }
}
