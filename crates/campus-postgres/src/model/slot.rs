//! Time slot model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::slots;

/// A teaching time slot (e.g. Morning, Afternoon, Evening).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Slot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// Unique human-readable slot name.
    pub name: String,
    /// Timestamp when the slot was created.
    pub created_at: Timestamp,
    /// Timestamp when the slot was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new slot.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSlot {
    /// Unique human-readable slot name.
    pub name: String,
}
