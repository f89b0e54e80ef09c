//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Published scholarships. Fees are optional and non-negative.
    scholarships (id) {
        id -> Uuid,
        scholarship_name -> Text,
        university_name -> Text,
        university_image -> Nullable<Text>,
        university_country -> Text,
        university_city -> Nullable<Text>,
        university_world_rank -> Nullable<Int4>,
        subject_category -> Text,
        scholarship_category -> Text,
        degree -> Text,
        tuition_fees -> Nullable<Float8>,
        application_fees -> Nullable<Float8>,
        service_charge -> Nullable<Float8>,
        application_deadline -> Nullable<Date>,
        post_date -> Timestamptz,
        posted_by -> Nullable<Text>,
    }
}

diesel::table! {
    /// Applications, unique on `(scholarship_id, user_email)`.
    applications (id) {
        id -> Uuid,
        scholarship_id -> Uuid,
        user_email -> Text,
        user_name -> Text,
        scholarship_name -> Text,
        university_name -> Text,
        scholarship_category -> Text,
        subject_category -> Text,
        degree -> Text,
        application_fees -> Float8,
        service_charge -> Float8,
        payment_status -> Text,
        application_status -> Text,
        feedback -> Text,
        created_at -> Timestamptz,
        application_date -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews with denormalised scholarship names.
    reviews (id) {
        id -> Uuid,
        scholarship_id -> Uuid,
        scholarship_name -> Text,
        university_name -> Text,
        reviewer_name -> Text,
        reviewer_email -> Text,
        reviewer_image -> Nullable<Text>,
        rating_point -> Int2,
        review_comment -> Text,
        review_date -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts, unique on `email`.
    users (id) {
        id -> Uuid,
        email -> Text,
        name -> Nullable<Text>,
        photo_url -> Nullable<Text>,
        role -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(applications, reviews, scholarships, users);
