//! HTTP handler functions for the Kerbside vehicle data API.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use kerbside_server_models::{
    ApiError, ApiHealth, InsuranceRequest, LicenceRequest, RegistrationRequest, ReportRequest,
    ReportResponse, ValuationRequest,
};
use kerbside_vehicle_data_models::DataError;
use serde::Serialize;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/vehicle-enquiry`
pub async fn vehicle_enquiry(
    state: web::Data<AppState>,
    body: web::Json<RegistrationRequest>,
) -> HttpResponse {
    respond(state.gateway.vehicle_enquiry(&body.registration).await)
}

/// `POST /api/driver-enquiry`
pub async fn driver_enquiry(
    state: web::Data<AppState>,
    body: web::Json<LicenceRequest>,
) -> HttpResponse {
    respond(state.gateway.driver_enquiry(&body.license_number).await)
}

/// `POST /api/mot-history`
pub async fn mot_history(
    state: web::Data<AppState>,
    body: web::Json<RegistrationRequest>,
) -> HttpResponse {
    respond(state.gateway.mot_history(&body.registration).await)
}

/// `POST /api/valuation`
pub async fn valuation(
    state: web::Data<AppState>,
    body: web::Json<ValuationRequest>,
) -> HttpResponse {
    respond(
        state
            .gateway
            .valuation(&body.vehicle_id, body.mileage, body.condition.as_deref())
            .await,
    )
}

/// `POST /api/insurance`
pub async fn insurance(
    state: web::Data<AppState>,
    body: web::Json<InsuranceRequest>,
) -> HttpResponse {
    respond(state.gateway.insurance(&body.vehicle_id).await)
}

/// `POST /api/history-check`
pub async fn history_check(
    state: web::Data<AppState>,
    body: web::Json<RegistrationRequest>,
) -> HttpResponse {
    respond(state.gateway.history_check(&body.registration).await)
}

/// `POST /api/vehicle-report`
///
/// The gateway report plus a risk assessment derived from the history
/// section when it populated.
pub async fn vehicle_report(
    state: web::Data<AppState>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    let outcome = state
        .gateway
        .comprehensive_report(&body.registration, body.mileage, body.condition.as_deref())
        .await;

    match outcome {
        Ok(report) => {
            let risk_assessment = report.history.as_ref().map(kerbside_risk::assess);
            HttpResponse::Ok().json(ReportResponse {
                report,
                risk_assessment,
            })
        }
        Err(e) => error_response(&e),
    }
}

/// Serves a gateway outcome: the raw upstream-shaped payload on
/// success, the taxonomy error body otherwise.
fn respond<T: Serialize>(outcome: Result<T, DataError>) -> HttpResponse {
    match outcome {
        Ok(payload) => HttpResponse::Ok().json(payload),
        Err(e) => error_response(&e),
    }
}

/// Maps a [`DataError`] onto its HTTP status and JSON error body.
/// Upstream statuses are mirrored; everything else uses the local
/// sentinel from the taxonomy.
fn error_response(error: &DataError) -> HttpResponse {
    log::warn!("Request failed ({}): {error}", error.kind());
    let status = StatusCode::from_u16(error.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ApiError {
        error: error.kind().to_string(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use httpmock::prelude::*;
    use kerbside_auth::{OAuthConfig, TokenCache};
    use kerbside_vehicle_data::registry::UpstreamService;
    use kerbside_vehicle_data::{GatewayConfig, VehicleDataGateway};
    use std::sync::Arc;

    fn unreachable_upstream(id: &str) -> UpstreamService {
        upstream_at(id, "http://127.0.0.1:9".to_string())
    }

    fn upstream_at(id: &str, base_url: String) -> UpstreamService {
        UpstreamService {
            id: id.to_string(),
            name: id.to_string(),
            base_url,
            env_override: String::new(),
            timeout_secs: 1,
            history_timeout_secs: None,
        }
    }

    /// State whose gateway has no credentials configured; local
    /// validation and configuration paths can be exercised without a
    /// live upstream.
    fn unconfigured_state() -> web::Data<AppState> {
        let config = GatewayConfig {
            ves: unreachable_upstream("dvla_ves"),
            driver: unreachable_upstream("dvla_driver"),
            mot: unreachable_upstream("dvsa_mot"),
            cap: unreachable_upstream("cap_hpi"),
            dvla_api_key: None,
            driver_api_token: None,
            mot_api_key: None,
            cap_api_token: None,
        };
        web::Data::new(AppState {
            gateway: Arc::new(VehicleDataGateway::new(
                config,
                TokenCache::new(OAuthConfig::default()),
            )),
        })
    }

    /// State whose CAP upstream points at the given mock server; the
    /// report composition can run end to end.
    fn cap_backed_state(server: &MockServer) -> web::Data<AppState> {
        let config = GatewayConfig {
            ves: unreachable_upstream("dvla_ves"),
            driver: unreachable_upstream("dvla_driver"),
            mot: unreachable_upstream("dvsa_mot"),
            cap: upstream_at("cap_hpi", format!("http://localhost:{}/cap", server.port())),
            dvla_api_key: None,
            driver_api_token: None,
            mot_api_key: None,
            cap_api_token: Some("cap-tok".to_string()),
        };
        web::Data::new(AppState {
            gateway: Arc::new(VehicleDataGateway::new(
                config,
                TokenCache::new(OAuthConfig::default()),
            )),
        })
    }

    fn mock_cap_vehicle(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/cap/vehicles/AB12CDE");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    serde_json::json!({
                        "capId": "CAP-1",
                        "registration": "AB12CDE",
                        "make": "FORD"
                    })
                    .to_string(),
                );
        });
    }

    #[actix_web::test]
    async fn invalid_registration_is_a_400() {
        let app = test::init_service(
            App::new()
                .app_data(unconfigured_state())
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/vehicle-enquiry")
            .set_json(serde_json::json!({ "registration": "NOT A PLATE!!" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_format");
    }

    #[actix_web::test]
    async fn missing_credentials_are_a_500() {
        let app = test::init_service(
            App::new()
                .app_data(unconfigured_state())
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/vehicle-enquiry")
            .set_json(serde_json::json!({ "registration": "AB12CDE" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "configuration");
    }

    #[actix_web::test]
    async fn lookup_routes_reject_non_post() {
        let app = test::init_service(
            App::new()
                .app_data(unconfigured_state())
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/vehicle-enquiry")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn vehicle_report_supplements_risk_from_history() {
        let server = MockServer::start();
        mock_cap_vehicle(&server);
        server.mock(|when, then| {
            when.method(GET).path("/cap/insurance/CAP-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"insuranceGroup":12}"#);
        });
        server.mock(|when, then| {
            when.method(GET).path("/cap/history/AB12CDE");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    serde_json::json!({
                        "stolen": true,
                        "writeOff": { "status": "clear" },
                        "mileage": { "status": "clear" },
                        "finance": { "status": "clear" },
                        "previousKeepers": { "count": 2 },
                        "import": { "status": "uk" }
                    })
                    .to_string(),
                );
        });

        let app = test::init_service(
            App::new()
                .app_data(cap_backed_state(&server))
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/vehicle-report")
            .set_json(serde_json::json!({ "registration": "AB12CDE" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["vehicle"]["capId"], "CAP-1");
        assert_eq!(body["riskAssessment"]["level"], "high");
        assert_eq!(body["riskAssessment"]["score"], 10);
        assert_eq!(
            body["riskAssessment"]["alerts"][0],
            "Vehicle reported as stolen"
        );
    }

    #[actix_web::test]
    async fn vehicle_report_without_history_has_no_risk() {
        let server = MockServer::start();
        mock_cap_vehicle(&server);
        server.mock(|when, then| {
            when.method(GET).path("/cap/insurance/CAP-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"insuranceGroup":12}"#);
        });
        server.mock(|when, then| {
            when.method(GET).path("/cap/history/AB12CDE");
            then.status(503).body(r#"{"message":"register offline"}"#);
        });

        let app = test::init_service(
            App::new()
                .app_data(cap_backed_state(&server))
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/vehicle-report")
            .set_json(serde_json::json!({ "registration": "AB12CDE" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["insurance"]["insuranceGroup"], 12);
        assert!(body.get("history").is_none());
        assert!(body.get("riskAssessment").is_none());
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(
            App::new()
                .app_data(unconfigured_state())
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["healthy"], true);
    }
}
