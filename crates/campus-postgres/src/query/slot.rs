//! Time slot repository for managing slot database operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewSlot, Slot};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for time slot database operations.
pub trait SlotRepository {
    /// Creates a new slot.
    fn create_slot(&self, new_slot: NewSlot) -> impl Future<Output = PgResult<Slot>> + Send;

    /// Finds a slot by id.
    fn find_slot(&self, slot_id: Uuid) -> impl Future<Output = PgResult<Option<Slot>>> + Send;

    /// Finds a slot by its unique name.
    fn find_slot_by_name(&self, name: &str)
    -> impl Future<Output = PgResult<Option<Slot>>> + Send;

    /// Lists slots, newest first.
    fn list_slots(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Slot>>> + Send;

    /// Deletes a slot. Returns true if a row was removed.
    fn delete_slot(&self, slot_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;
}

impl SlotRepository for PgClient {
    async fn create_slot(&self, new_slot: NewSlot) -> PgResult<Slot> {
        let mut conn = self.get_connection().await?;

        use schema::slots;

        diesel::insert_into(slots::table)
            .values(&new_slot)
            .returning(Slot::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn find_slot(&self, slot_id: Uuid) -> PgResult<Option<Slot>> {
        let mut conn = self.get_connection().await?;

        use schema::slots::{self, dsl};

        slots::table
            .filter(dsl::id.eq(slot_id))
            .select(Slot::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_slot_by_name(&self, name: &str) -> PgResult<Option<Slot>> {
        let mut conn = self.get_connection().await?;

        use schema::slots::{self, dsl};

        slots::table
            .filter(dsl::name.eq(name))
            .select(Slot::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_slots(&self, pagination: Pagination) -> PgResult<Vec<Slot>> {
        let mut conn = self.get_connection().await?;

        use schema::slots::{self, dsl};

        slots::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Slot::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn delete_slot(&self, slot_id: Uuid) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use schema::slots::{self, dsl};

        let rows_affected = diesel::delete(slots::table.filter(dsl::id.eq(slot_id)))
            .execute(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows_affected > 0)
    }
}
