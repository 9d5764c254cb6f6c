use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use shared::{MetricPoint, SetPotentialLockRequest};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::domain::calculator::summarize;
use crate::domain::dashboard::{parse_view_date, parse_view_kind};
use crate::domain::mock_data;
use crate::domain::{DashboardService, PotentialLockService, TimeProgress};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub potential_lock: PotentialLockService,
}

impl AppState {
    pub fn new(dashboard: DashboardService, potential_lock: PotentialLockService) -> Self {
        Self {
            dashboard,
            potential_lock,
        }
    }
}

/// Query parameters for GET /api/progress
#[derive(Deserialize, Debug)]
pub struct ProgressQuery {
    pub value: f64,
    pub target: f64,
    /// Percentage of the period elapsed, 0 to 100
    pub elapsed_percent: f64,
}

/// Query parameters for the dashboard endpoints
#[derive(Deserialize, Debug)]
pub struct DashboardQuery {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/progress", get(get_progress))
        .route("/dashboard", get(get_all_views))
        .route("/dashboard/:view", get(get_view))
        .route("/planning/potential", get(get_potential))
        .route("/planning/potential/lock", post(set_potential_lock));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Axum handler function for GET /api/progress
pub async fn get_progress(Query(query): Query<ProgressQuery>) -> impl IntoResponse {
    info!("GET /api/progress - query: {:?}", query);

    match TimeProgress::from_percent(query.elapsed_percent) {
        Ok(time_progress) => {
            let summary = summarize(MetricPoint::new(query.value, query.target), time_progress);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => {
            warn!("Rejected progress query: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Axum handler function for GET /api/dashboard/:view
pub async fn get_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    info!("GET /api/dashboard/{} - query: {:?}", view, query);

    let kind = match parse_view_kind(&view) {
        Ok(kind) => kind,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };
    let date = match parse_view_date(query.date.as_deref(), Local::now().date_naive()) {
        Ok(date) => date,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    (StatusCode::OK, Json(state.dashboard.build_view(kind, date))).into_response()
}

/// Axum handler function for GET /api/dashboard
pub async fn get_all_views(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - query: {:?}", query);

    match parse_view_date(query.date.as_deref(), Local::now().date_naive()) {
        Ok(date) => (StatusCode::OK, Json(state.dashboard.build_all(date))).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// Axum handler function for GET /api/planning/potential
pub async fn get_potential(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/planning/potential");

    match state.potential_lock.status(mock_data::potential_hours()).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            error!("Error reading potential lock: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading potential lock").into_response()
        }
    }
}

/// Axum handler function for POST /api/planning/potential/lock
pub async fn set_potential_lock(
    State(state): State<AppState>,
    Json(request): Json<SetPotentialLockRequest>,
) -> impl IntoResponse {
    info!("POST /api/planning/potential/lock - request: {:?}", request);

    match state
        .potential_lock
        .set_locked(request.locked, mock_data::potential_hours())
        .await
    {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            error!("Error storing potential lock: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store potential lock").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_thresholds;
    use crate::db::MemoryKeyValueStore;
    use axum::body::Body;
    use axum::http::Request;
    use shared::{DashboardView, PotentialLockStatus, ProgressSummary, UndefinedProjection, ViewKind};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = AppState::new(
            DashboardService::new(default_thresholds()),
            PotentialLockService::new(Arc::new(MemoryKeyValueStore::new())),
        );
        create_router(state)
    }

    async fn get_json(app: Router, uri: &str) -> Result<(StatusCode, Vec<u8>), Box<dyn std::error::Error>> {
        let response = app
            .oneshot(Request::builder().uri(uri).method(Method::GET).body(Body::empty())?)
            .await?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    #[tokio::test]
    async fn test_progress_endpoint() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get_json(test_router(), "/api/progress?value=59&target=735&elapsed_percent=50").await?;

        assert_eq!(status, StatusCode::OK);
        let summary: ProgressSummary = serde_json::from_slice(&body)?;
        assert_eq!(summary.remaining, 676.0);
        assert_eq!(summary.percent_complete, 8.0);
        assert_eq!(summary.projection.projected_value(), Some(118.0));
        assert_eq!(summary.projection.projected_percent(), Some(16.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_at_period_start() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get_json(test_router(), "/api/progress?value=10&target=100&elapsed_percent=0").await?;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["projection"]["status"], "undefined");
        assert_eq!(json["projection"]["reason"], "period_not_started");

        let summary: ProgressSummary = serde_json::from_slice(&body)?;
        assert_eq!(
            summary.projection,
            shared::ProjectionOutcome::Undefined { reason: UndefinedProjection::PeriodNotStarted }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_with_zero_target_reads_back() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get_json(test_router(), "/api/progress?value=10&target=0&elapsed_percent=50").await?;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(json["percent_complete"].is_null());

        let summary: ProgressSummary = serde_json::from_slice(&body)?;
        assert_eq!(summary.remaining, -10.0);
        assert!(summary.percent_complete.is_nan());
        assert_eq!(
            summary.projection,
            shared::ProjectionOutcome::Undefined { reason: UndefinedProjection::ZeroTarget }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_rejects_elapsed_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
        let (status, _) = get_json(test_router(), "/api/progress?value=10&target=100&elapsed_percent=150").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_view_endpoint() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get_json(test_router(), "/api/dashboard/heures?date=2025-06-15").await?;

        assert_eq!(status, StatusCode::OK);
        let view: DashboardView = serde_json::from_slice(&body)?;
        assert_eq!(view.view, ViewKind::Hours);
        assert_eq!(view.elapsed_percent, 50.0);
        assert_eq!(view.cards[0].label, "Mécanique");
        assert_eq!(view.cards[0].summary.projection.projected_percent(), Some(16.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_unknown_view() -> Result<(), Box<dyn std::error::Error>> {
        let (status, _) = get_json(test_router(), "/api/dashboard/ventes-vn").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_bad_date() -> Result<(), Box<dyn std::error::Error>> {
        let (status, _) = get_json(test_router(), "/api/dashboard/qualite?date=15-06-2025").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_all_views_endpoint() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get_json(test_router(), "/api/dashboard?date=2025-06-15").await?;

        assert_eq!(status, StatusCode::OK);
        let views: Vec<DashboardView> = serde_json::from_slice(&body)?;
        assert_eq!(views.len(), ViewKind::ALL.len());
        Ok(())
    }

    #[tokio::test]
    async fn test_potential_lock_flow() -> Result<(), Box<dyn std::error::Error>> {
        let app = test_router();

        let (status, body) = get_json(app.clone(), "/api/planning/potential").await?;
        assert_eq!(status, StatusCode::OK);
        let initial: PotentialLockStatus = serde_json::from_slice(&body)?;
        assert!(!initial.locked);

        let request_body = SetPotentialLockRequest { locked: true };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/planning/potential/lock")
                    .method(Method::POST)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&request_body)?))?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let (_, body) = get_json(app, "/api/planning/potential").await?;
        let locked: PotentialLockStatus = serde_json::from_slice(&body)?;
        assert!(locked.locked);
        assert_eq!(locked.values, initial.values);
        Ok(())
    }
}
