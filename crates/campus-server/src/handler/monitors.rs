//! Health monitoring handlers.

use axum::extract::State;
use campus_mailer::MailerService;
use campus_postgres::PgClient;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitoring operations.
const TRACING_TARGET: &str = "campus_server::handler::monitors";

/// Connection pool snapshot.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct PoolHealth {
    /// Maximum number of pooled connections.
    pub max_size: usize,
    /// Connections currently open.
    pub size: usize,
    /// Connections currently available.
    pub available: usize,
    /// Requests waiting for a connection.
    pub waiting: usize,
}

/// Health probe response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// Overall status string.
    pub status: String,
    /// Database pool snapshot.
    pub database: PoolHealth,
    /// Mailer status string.
    pub mailer: String,
}

/// Liveness/readiness probe.
///
/// Reports the connection pool snapshot and the mailer's own health
/// check. Does not open new database connections.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/monitors/health", tag = "monitors",
    responses(
        (status = OK, description = "Service health snapshot", body = HealthResponse),
    ),
)]
async fn health(
    State(pg_client): State<PgClient>,
    State(mailer): State<MailerService>,
) -> Result<Json<HealthResponse>> {
    let pool = pg_client.pool_status();

    let mailer_status = match mailer.health_check().await {
        Ok(health) if health.is_operational() => "healthy".to_owned(),
        Ok(_) => "unhealthy".to_owned(),
        Err(e) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "mailer health check failed"
            );
            "unhealthy".to_owned()
        }
    };

    let status = if pool.is_under_pressure() {
        "degraded"
    } else {
        "healthy"
    };

    Ok(Json(HealthResponse {
        status: status.to_owned(),
        database: PoolHealth {
            max_size: pool.max_size,
            size: pool.size,
            available: pool.available,
            waiting: pool.waiting,
        },
        mailer: mailer_status,
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(health))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn health_reports_without_database() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.get("/monitors/health").await;
        response.assert_status_ok();

        let body: HealthResponse = response.json();
        assert_eq!(body.mailer, "healthy");
        assert!(body.database.size <= body.database.max_size);

        Ok(())
    }
}
