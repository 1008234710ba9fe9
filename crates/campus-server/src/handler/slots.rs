//! Time slot listing and administration handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campus_postgres::PgClient;
use campus_postgres::model::NewSlot;
use campus_postgres::query::{EnrollmentRepository, Pagination, SlotRepository};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, Path, ValidateJson};
use crate::handler::response::SlotRecord;
use crate::handler::{ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for slot operations.
const TRACING_TARGET: &str = "campus_server::handler::slots";

/// Response carrying all slots.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SlotListResponse {
    /// Slots, newest first.
    pub slots: Vec<SlotRecord>,
}

/// Lists all time slots.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/slots", tag = "slots",
    responses(
        (status = OK, description = "All slots", body = SlotListResponse),
    ),
)]
async fn list_slots(State(pg_client): State<PgClient>) -> Result<Json<SlotListResponse>> {
    let slots = pg_client
        .list_slots(Pagination::default())
        .await?
        .into_iter()
        .map(SlotRecord::from)
        .collect();

    Ok(Json(SlotListResponse { slots }))
}

/// Request payload for creating a slot.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateSlotRequest {
    /// Unique slot name (e.g. Morning, Afternoon, Evening).
    #[validate(length(min = 1, message = "Slot name is required"))]
    pub name: String,
}

/// Response carrying a single slot.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SlotResponse {
    /// The slot.
    pub slot: SlotRecord,
}

/// Creates a new time slot.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/slots", tag = "slots",
    request_body = CreateSlotRequest,
    responses(
        (status = CREATED, description = "Slot created", body = SlotResponse),
        (status = BAD_REQUEST, description = "Slot name missing", body = ErrorResponse),
        (status = CONFLICT, description = "Slot already exists", body = ErrorResponse),
    ),
)]
async fn create_slot(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<CreateSlotRequest>,
) -> Result<(StatusCode, Json<SlotResponse>)> {
    let name = request.name.trim().to_owned();
    if name.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Slot name is required")
            .into_static());
    }

    if pg_client.find_slot_by_name(&name).await?.is_some() {
        return Err(ErrorKind::Conflict
            .with_message("Slot already exists")
            .with_resource("slot")
            .into_static());
    }

    let slot = pg_client.create_slot(NewSlot { name }).await?;

    tracing::info!(
        target: TRACING_TARGET,
        slot_id = %slot.id,
        name = %slot.name,
        "slot created"
    );

    Ok((StatusCode::CREATED, Json(SlotResponse { slot: slot.into() })))
}

/// Response returned after deleting a slot.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DeleteSlotResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Deletes a time slot.
///
/// Refused while enrollments still reference the slot.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/slots/{slot_id}", tag = "slots",
    params(("slot_id" = Uuid, Path, description = "Slot to delete")),
    responses(
        (status = OK, description = "Slot deleted", body = DeleteSlotResponse),
        (status = NOT_FOUND, description = "Slot not found", body = ErrorResponse),
        (status = CONFLICT, description = "Slot still has enrollments", body = ErrorResponse),
    ),
)]
async fn delete_slot(
    State(pg_client): State<PgClient>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<DeleteSlotResponse>> {
    if pg_client.find_slot(slot_id).await?.is_none() {
        return Err(ErrorKind::NotFound
            .with_message("Slot not found")
            .with_resource("slot")
            .into_static());
    }

    let enrollments = pg_client.count_slot_enrollments(slot_id).await?;
    if enrollments > 0 {
        return Err(ErrorKind::Conflict
            .with_message("Cannot delete slot with active enrollments")
            .with_resource("slot")
            .into_static());
    }

    pg_client.delete_slot(slot_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        slot_id = %slot_id,
        "slot deleted"
    );

    Ok(Json(DeleteSlotResponse {
        message: "Slot deleted successfully".to_owned(),
    }))
}

/// Returns a [`Router`] with the public (read-only) routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(list_slots))
}

/// Returns a [`Router`] with the admin-gated routes.
///
/// [`Router`]: axum::routing::Router
pub fn admin_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(create_slot))
        .routes(routes!(delete_slot))
}
