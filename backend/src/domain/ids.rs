//! Store-assigned entity identifiers.
//!
//! Identifiers are opaque 64-bit integers handed out by the repository when
//! an entity is first persisted. Each entity gets its own newtype so a tag id
//! cannot be passed where an activity id is expected.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw identifier value.
            #[must_use]
            pub const fn get(self) -> i64 {
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

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of a [`crate::domain::Tag`].
    TagId
}

define_id! {
    /// Identifier of a [`crate::domain::Activity`].
    ActivityId
}

define_id! {
    /// Identifier of a [`crate::domain::Expense`].
    ExpenseId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_raw_value() {
        let mut ids = vec![TagId::new(3), TagId::new(1), TagId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![TagId::new(1), TagId::new(2), TagId::new(3)]);
    }

    #[test]
    fn display_prints_raw_value() {
        assert_eq!(ActivityId::new(42).to_string(), "42");
        assert_eq!(i64::from(ExpenseId::new(7)), 7);
    }
}
