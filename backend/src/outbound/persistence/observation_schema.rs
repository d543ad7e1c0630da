//! Diesel table definition for the observation store.
//!
//! Lives in a separate database from [`super::schema`]; the two are never
//! joined in SQL.

diesel::table! {
    /// Append-only observation points.
    observation_points (id) {
        id -> Int8,
        element_id -> Int8,
        file_id -> Int8,
        latitude -> Float8,
        longitude -> Float8,
        value -> Float8,
        observed_at -> Timestamptz,
    }
}
