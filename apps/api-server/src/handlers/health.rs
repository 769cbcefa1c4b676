//! Health endpoint.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bloghub_core::ports::UserRepository;

use crate::state::AppState;

/// GET /api/health response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    /// Whether the document store answered a probe read.
    pub store: String,
}

/// GET /api/health - liveness plus a store readiness probe.
///
/// The probe is a point read of a nil id; only reachability matters, not the
/// result.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_up = state.users.find_by_id(Uuid::nil()).await.is_ok();

    let response = HealthResponse {
        status: if store_up { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        store: if store_up { "up" } else { "down" }.to_string(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use super::HealthResponse;
    use crate::handlers::configure_routes;
    use crate::state::AppState;

    #[actix_web::test]
    async fn reports_ok_with_a_reachable_store() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let body: HealthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;

        assert_eq!(body.status, "ok");
        assert_eq!(body.store, "up");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
