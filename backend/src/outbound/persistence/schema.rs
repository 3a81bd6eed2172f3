//! Diesel table definitions. Must match `migrations/` exactly.

diesel::table! {
    /// Marketplace users keyed by lower-cased email.
    users (email) {
        email -> Varchar,
        name -> Varchar,
        role -> Varchar,
        photo_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Class listings. `seat_capacity` counts open seats.
    classes (id) {
        id -> Uuid,
        instructor_email -> Varchar,
        instructor_name -> Varchar,
        title -> Varchar,
        image_url -> Nullable<Varchar>,
        price_cents -> Int8,
        seat_capacity -> Int4,
        enrolled -> Int4,
        status -> Varchar,
        feedback -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student bookings with their payment state.
    bookings (id) {
        id -> Uuid,
        class_id -> Uuid,
        class_title -> Varchar,
        student_email -> Varchar,
        instructor_email -> Varchar,
        price_cents -> Int8,
        status -> Varchar,
        transaction_id -> Nullable<Varchar>,
        paid_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(bookings -> classes (class_id));

diesel::allow_tables_to_appear_in_same_query!(users, classes, bookings);
