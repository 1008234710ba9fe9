//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Public routes cover registration, the one-time-code login flow,
//! course/slot listings, the student profile and the health probe.
//! Admin routes sit behind the password gate middleware.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod courses;
mod enrollments;
mod error;
mod monitors;
mod profile;
mod registration;
mod response;
mod slots;
mod students;

use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use utoipa_axum::router::OpenApiRouter;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub(crate) use crate::handler::response::ErrorResponse;
use crate::middleware::require_admin;
use crate::service::ServiceState;

#[inline]
async fn fallback_handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`OpenApiRouter`] with all admin-gated routes.
fn admin_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .merge(students::routes())
        .merge(enrollments::routes())
        .merge(courses::admin_routes())
        .merge(slots::admin_routes())
}

/// Returns an [`OpenApiRouter`] with all public routes.
fn public_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .merge(authentication::routes())
        .merge(registration::routes())
        .merge(profile::routes())
        .merge(courses::routes())
        .merge(slots::routes())
        .merge(monitors::routes())
}

/// Returns an [`OpenApiRouter`] with all routes.
pub fn routes(state: ServiceState) -> OpenApiRouter<ServiceState> {
    let require_admin = from_fn_with_state(state, require_admin);

    let admin_router = admin_routes().route_layer(require_admin);
    let public_router = public_routes();

    OpenApiRouter::new()
        .merge(admin_router)
        .merge(public_router)
        .fallback(fallback_handler)
}

#[cfg(test)]
mod test {
    use axum_test::TestServer;
    use utoipa_axum::router::OpenApiRouter;

    use crate::handler::routes;
    use crate::service::{ServiceState, test_state};

    /// Returns a new [`TestServer`] with the given router and a test state.
    pub async fn create_test_server_with_router(
        router: OpenApiRouter<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let (state, _mailer) = test_state().await;
        create_test_server_with_state(router, state).await
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub async fn create_test_server_with_state(
        router: OpenApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state(state);
        let (app, _) = app.split_for_parts();
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the full router and a test state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let (state, _mailer) = test_state().await;
        let router = routes(state.clone());
        create_test_server_with_state(router, state).await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let response = server.get("/no/such/route").await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn admin_routes_require_the_password_header() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/admin/students").await;
        response.assert_status_unauthorized();

        let response = server
            .get("/admin/students")
            .add_header("x-admin-password", "wrong-password")
            .await;
        response.assert_status_forbidden();

        Ok(())
    }
}
