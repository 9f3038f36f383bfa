//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! When a migration changes a table, update the matching block here (or
//! regenerate it with `diesel print-schema`).

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        id -> Int4,
        #[max_length = 50]
        username -> Varchar,
        #[max_length = 150]
        email -> Varchar,
        /// Argon2 PHC string.
        #[max_length = 255]
        password -> Varchar,
        /// SHA-256 digest of the live refresh token, if any.
        #[max_length = 255]
        refresh_token -> Nullable<Varchar>,
        #[max_length = 255]
        avatar -> Nullable<Varchar>,
        confirmed -> Bool,
        /// SHA-256 digest of the pending confirmation token, if any.
        #[max_length = 255]
        confirmation_token -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Address book entries, each owned by exactly one user.
    ///
    /// `(user_id, email)` carries the `contacts_user_email_key` unique
    /// constraint.
    contacts (id) {
        id -> Int4,
        user_id -> Int4,
        #[max_length = 100]
        first_name -> Varchar,
        #[max_length = 100]
        last_name -> Varchar,
        #[max_length = 150]
        email -> Varchar,
        #[max_length = 32]
        phone_number -> Varchar,
        birth_date -> Date,
        additional_data -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(contacts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(contacts, users);
