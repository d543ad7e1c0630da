//! Diesel table definitions for the relational store.
//!
//! These must match `migrations/relational` exactly.

diesel::table! {
    /// Registered users. `password_hash` is managed by the external login
    /// flow and never selected by this service.
    users (id) {
        id -> Int8,
        email -> Varchar,
        full_name -> Nullable<Varchar>,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Element groupings such as "Temperature" or "Chemistry".
    element_categories (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Measurable quantities, optionally grouped by category.
    elements (id) {
        id -> Int8,
        name -> Varchar,
        category_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// One row per uploaded file with the rectangle its points cover.
    files (id) {
        id -> Int8,
        user_id -> Int8,
        uploaded_at -> Timestamptz,
        lat_min -> Float8,
        lat_max -> Float8,
        long_min -> Float8,
        long_max -> Float8,
    }
}

diesel::joinable!(files -> users (user_id));
diesel::joinable!(elements -> element_categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(users, element_categories, elements, files);
