use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::app::AppState;

pub(crate) async fn exporter(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, state.telemetry().render_prometheus()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{api::router, app::testing::state_with};

    #[tokio::test]
    async fn renders_registered_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), None);
        state.metrics().texts_analyzed.inc_by(3.0);
        let app = router(state);

        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("review_texts_analyzed_total 3"));
        assert!(text.contains("review_upload_duration_seconds"));
    }
}
