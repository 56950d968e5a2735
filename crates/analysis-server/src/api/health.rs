//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use chess_analysis::EngineLauncher;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Engine executable the server was started with.
    pub stockfish_path: String,
}

/// GET /health
pub async fn health<L: EngineLauncher + 'static>(State(state): State<AppState<L>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        stockfish_path: state.service.config().path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chess_analysis::{AnalysisService, EngineConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_engine_path() {
        let service = AnalysisService::new(EngineConfig::new("/usr/games/stockfish"));
        let app = crate::app(AppState::new(service, 15));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.stockfish_path, "/usr/games/stockfish");
    }
}
