//! Diesel schema for card link persistence.

diesel::table! {
    /// Card-to-story links keyed by `"{source_id}_created"`.
    card_links (link_key) {
        /// Identity store key.
        #[max_length = 255]
        link_key -> Varchar,
        /// Board card identifier.
        #[max_length = 255]
        source_id -> Varchar,
        /// Card name marker captured at reservation time.
        card_name -> Text,
        /// Tracker story identifier, unset while only reserved.
        #[max_length = 255]
        target_id -> Nullable<Varchar>,
        /// Reservation timestamp.
        reserved_at -> Timestamptz,
        /// Link timestamp, unset while only reserved.
        linked_at -> Nullable<Timestamptz>,
    }
}
