//! Domain entities, validators, ports, and use-case services.
//!
//! Purpose: hold the life-logging rules independent of HTTP and storage.
//! Entities validate and normalise themselves; services enforce
//! referential integrity before handing off to repository ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error envelope.
//! - Tag / Activity / Expense and their `New*` inputs.
//! - LifelogError: failure of a driving-port operation.
//! - AddingService / EditingService / DeletingService / ListingService /
//!   AuthService: implementations of the driving ports in [`ports`].

mod activity;
mod adding;
mod auth;
mod deleting;
mod editing;
pub mod error;
mod expense;
mod ids;
mod listing;
pub mod ports;
mod references;
mod service_error;
#[cfg(test)]
pub(crate) mod service_test_helpers;
mod tag;
pub mod trace_id;
mod validation;

pub use self::activity::{Activity, NewActivity};
pub use self::adding::AddingService;
pub use self::auth::AuthService;
pub use self::deleting::DeletingService;
pub use self::editing::EditingService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::expense::{Expense, NewExpense};
pub use self::ids::{ActivityId, ExpenseId, TagId};
pub use self::listing::ListingService;
pub use self::service_error::{LifelogError, PASSWORD_MAX, PASSWORD_MIN};
pub use self::tag::{NewTag, Tag};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{
    ACTIVITY_DESC_MAX, ACTIVITY_LABEL_MAX, ACTIVITY_LABEL_MIN, ACTIVITY_PLACE_MAX,
    EXPENSE_LABEL_MAX, EXPENSE_LABEL_MIN, EXPENSE_UNIT_MAX, EXPENSE_UNIT_MIN, TAG_NAME_MAX,
    TAG_NAME_MIN, ValidationError,
};

