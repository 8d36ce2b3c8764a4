//! Diesel row models for card link persistence.

use super::schema::card_links;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for card links.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = card_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LinkRow {
    /// Identity store key.
    pub link_key: String,
    /// Board card identifier.
    pub source_id: String,
    /// Card name marker.
    pub card_name: String,
    /// Tracker story identifier.
    pub target_id: Option<String>,
    /// Reservation timestamp.
    pub reserved_at: DateTime<Utc>,
    /// Link timestamp.
    pub linked_at: Option<DateTime<Utc>>,
}

/// Insert model for reservations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = card_links)]
pub struct NewReservationRow {
    /// Identity store key.
    pub link_key: String,
    /// Board card identifier.
    pub source_id: String,
    /// Card name marker.
    pub card_name: String,
    /// Reservation timestamp.
    pub reserved_at: DateTime<Utc>,
}
