//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Tags with globally unique, normalised names.
    tags (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    activities (id) {
        id -> Int8,
        label -> Varchar,
        place -> Varchar,
        description -> Varchar,
        started_at -> Timestamptz,
        /// Whole seconds, never negative.
        duration_secs -> Int8,
    }
}

diesel::table! {
    expenses (id) {
        id -> Int8,
        label -> Varchar,
        spent_at -> Timestamptz,
        value -> Float8,
        unit -> Varchar,
        /// Linked activity, if any.
        activity_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Activity to tag links; removed with their activity.
    activity_tags (activity_id, tag_id) {
        activity_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Expense to tag links; removed with their expense.
    expense_tags (expense_id, tag_id) {
        expense_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::joinable!(activity_tags -> activities (activity_id));
diesel::joinable!(activity_tags -> tags (tag_id));
diesel::joinable!(expense_tags -> expenses (expense_id));
diesel::joinable!(expense_tags -> tags (tag_id));
diesel::joinable!(expenses -> activities (activity_id));

diesel::allow_tables_to_appear_in_same_query!(
    activities,
    activity_tags,
    expense_tags,
    expenses,
    tags,
);
