//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` when they change.

diesel::table! {
    /// Contact records.
    ///
    /// One row per submitted identity fact. `link_precedence` is `primary`
    /// or `secondary`; `linked_id` is set exactly for secondaries. Partial
    /// unique indexes on `(email)` and `(phone_number)` over live primaries
    /// arbitrate concurrent primary creation.
    contacts (id) {
        /// Primary key, assigned by the store, monotonic with creation.
        id -> Int8,
        /// Optional phone number, immutable after creation.
        phone_number -> Nullable<Text>,
        /// Optional email, immutable after creation.
        email -> Nullable<Text>,
        /// The cluster primary this row links to, for secondaries only.
        linked_id -> Nullable<Int8>,
        /// `primary` or `secondary`.
        link_precedence -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Advanced on demotion; otherwise equals `created_at`.
        updated_at -> Timestamptz,
        /// Soft-delete marker; set rows are invisible to resolution.
        deleted_at -> Nullable<Timestamptz>,
    }
}
