//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Registered accounts. `email` carries a unique constraint.
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        verified -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Institutions. Rows are removed with the user in `added_by`.
    institutions (id) {
        id -> Uuid,
        name -> Text,
        location -> Text,
        description -> Text,
        owner_id -> Nullable<Uuid>,
        added_by -> Uuid,
        images -> Array<Text>,
        /// Insertion order for listings.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews. Rows are removed with their author or institution.
    reviews (id) {
        id -> Uuid,
        rating -> Int2,
        comment -> Text,
        user_id -> Uuid,
        institution_id -> Uuid,
        images -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> institutions (institution_id));

diesel::allow_tables_to_appear_in_same_query!(users, institutions, reviews);
