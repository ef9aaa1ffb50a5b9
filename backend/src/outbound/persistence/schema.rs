//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Relational copy of each user.
    ///
    /// `user_id` is assigned by the `users_user_id_seq` sequence and stored as
    /// text so composite identifiers can be compared against it unchanged.
    users (user_id) {
        user_id -> Text,
        name -> Text,
        created_at -> Timestamptz,
    }
}
