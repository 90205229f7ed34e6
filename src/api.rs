pub(crate) mod export;
pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod predict;
pub(crate) mod sentiment;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::app::AppState;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .route("/v1/sentiment/analyze", post(sentiment::analyze))
        .route("/v1/sentiment/reviews", post(sentiment::reviews))
        .route("/v1/predict", post(predict::predict))
        .route("/v1/exports/{source}", post(export::export))
        .with_state(state)
}

/// リクエスト単位で失敗した場合の応答本文。
#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub(crate) fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    message: Option<String>,
) -> Response {
    let body = Json(ErrorResponse {
        ok: false,
        error: error.into(),
        message,
    });
    (status, body).into_response()
}

/// JSON 本文の抽出器。解析に失敗した場合も `ErrorResponse` の形で応答する。
pub(crate) struct ApiJson<T>(pub(crate) T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_response(
                rejection.status(),
                "Invalid JSON body",
                Some(rejection.body_text()),
            )),
        }
    }
}

/// 先頭 `limit` 件のプレビュー。
pub(crate) fn preview<T>(items: &[T], limit: usize) -> &[T] {
    &items[..items.len().min(limit)]
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::state_with;
    use rstest::rstest;
    use serde_json::json;
    use crate::api::test_support::{post_json, post_raw};

    #[rstest]
    #[case("/v1/sentiment/analyze")]
    #[case("/v1/sentiment/reviews")]
    #[case("/v1/predict")]
    #[case("/v1/exports/playstore")]
    #[tokio::test]
    async fn malformed_json_uses_error_envelope(#[case] uri: &str) {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_with(dir.path(), None));

        let (status, body) = post_raw(app, uri, "{\"text\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Invalid JSON body");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn mistyped_fields_use_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_with(dir.path(), None));

        let (status, body) = post_json(
            app,
            "/v1/exports/playstore",
            &json!({"app": {"id": "com.contoh"}, "records": [], "limit": -1}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[test]
    fn preview_is_capped_by_length() {
        let items = [1, 2, 3];
        assert_eq!(preview(&items, 2), &[1, 2]);
        assert_eq!(preview(&items, 10), &[1, 2, 3]);
        assert!(preview::<i32>(&[], 10).is_empty());
    }
}
