//! oacare-server
//!
//! HTTP surface of the OA Care service: axum router, handlers, session
//! extraction and configuration. The binary runs it under AWS Lambda or as a
//! plain TCP server.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = TimeoutLayer::new(state.config.request_timeout);

    Router::new()
        // Health and session (no auth)
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/session", get(routes::auth::session))
        // Screening
        .route(
            "/assessment",
            get(routes::assessments::list_assessments).post(routes::assessments::create_assessment),
        )
        .route("/assessment_results", post(routes::assessment_results::create_result))
        .route("/assessment_results/{id}", get(routes::assessment_results::get_result))
        // Registry
        .route(
            "/elderly",
            get(routes::elderly::list_elderly).post(routes::elderly::create_elderly),
        )
        .route("/elderly/exists", get(routes::elderly::elderly_exists))
        .route(
            "/elderly/{id}",
            get(routes::elderly::get_elderly)
                .put(routes::elderly::update_elderly)
                .delete(routes::elderly::delete_elderly),
        )
        // Reports (admin, executive)
        .route("/reports/knee_oa", get(routes::reports::knee_oa))
        .route("/reports/trend", get(routes::reports::yearly_trend))
        .route("/reports/maps_oa", get(routes::reports::maps_oa))
        .route("/reports/travel", get(routes::reports::travel))
        .route(
            "/reports/analysis_results",
            get(routes::analysis::list_analysis_results).post(routes::analysis::create_analysis_result),
        )
        .route("/executive/oa_risk/list", get(routes::executive::risk_list))
        .route("/executive/oa_risk/{elderly_id}", get(routes::executive::risk_detail))
        .route("/executive/map", get(routes::executive::map_lookup))
        // Administration
        .route(
            "/manageuser",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/manageuser/{user_id}",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route(
            "/healthinfo",
            get(routes::health_info::list_health_info).post(routes::health_info::create_health_info),
        )
        .route(
            "/healthinfo/{id}",
            get(routes::health_info::get_health_info)
                .put(routes::health_info::update_health_info)
                .delete(routes::health_info::delete_health_info),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(timeout)
        .layer(cors)
        .with_state(state)
}
