//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When migrations
//! change the schema, regenerate them with `diesel print-schema` or update
//! them by hand.

diesel::table! {
    /// Profile rows keyed by the identity provider's user id.
    profiles (id) {
        id -> Uuid,
        email -> Text,
        full_name -> Nullable<Text>,
        avatar_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notes owned by a single user.
    notes (id) {
        /// Primary key generated by the database.
        id -> Uuid,
        /// Owning user; every query filters on it.
        user_id -> Uuid,
        /// Title, at most 100 characters.
        title -> Varchar,
        content -> Text,
        /// Set at most once by summarization.
        summary -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
