//! Diesel table definitions for the account tables.
//!
//! Kept in sync by hand with `backend/migrations`.

diesel::table! {
    /// Authenticatable accounts.
    ///
    /// `username` and `email` carry the unique constraints
    /// `identities_username_key` and `identities_email_key`.
    identities (id) {
        id -> Uuid,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        /// Argon2id PHC string.
        credential -> Text,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Postal addresses referenced by at most one profile.
    addresses (id) {
        id -> Uuid,
        #[max_length = 255]
        line1 -> Varchar,
        #[max_length = 100]
        city -> Varchar,
        #[max_length = 100]
        state -> Varchar,
        #[max_length = 10]
        postal_code -> Varchar,
    }
}

diesel::table! {
    /// Role profiles, unique per `(role, identity_id)`.
    ///
    /// Deleting an identity cascades; deleting an address nulls
    /// `address_id`.
    profiles (id) {
        id -> Uuid,
        #[max_length = 16]
        role -> Varchar,
        identity_id -> Uuid,
        address_id -> Nullable<Uuid>,
        #[max_length = 100]
        image_ref -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> identities (identity_id));
diesel::joinable!(profiles -> addresses (address_id));

diesel::allow_tables_to_appear_in_same_query!(identities, addresses, profiles);
