use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    api::{ApiJson, error_response, preview},
    app::AppState,
    review::Review,
    sentiment::{AnalyzedReview, BatchStats, SentimentResult, analyze_reviews, batch_stats},
    source::{MalformedRecordError, canonical},
};

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    texts: Option<Value>,
}

#[derive(Debug, Serialize)]
struct SingleResponse {
    ok: bool,
    result: SentimentResult,
}

#[derive(Debug, Serialize)]
struct BatchResponse<'a> {
    ok: bool,
    results: &'a [SentimentResult],
    stats: BatchStats,
    preview: &'a [SentimentResult],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewsRequest {
    #[serde(default)]
    reviews: Value,
    #[serde(default)]
    text_field: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReviewsResponse<'a> {
    ok: bool,
    count: usize,
    reviews: &'a [AnalyzedReview],
    preview: &'a [AnalyzedReview],
    stats: BatchStats,
    errors: Vec<MalformedRecordError>,
}

/// 単一テキスト（`text`）またはテキスト配列（`texts`）を分析する。
#[allow(clippy::cast_precision_loss)]
pub(crate) async fn analyze(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AnalyzeRequest>,
) -> Response {
    let limit = state.config().preview_limit();

    if let Some(Value::String(text)) = payload.text.as_ref().filter(|text| is_truthy(text)) {
        let result = state.analyzer().analyze(text);
        state.metrics().texts_analyzed.inc();
        return Json(SingleResponse { ok: true, result }).into_response();
    }

    if let Some(texts @ Value::Array(_)) = payload.texts.as_ref() {
        let results = match state.analyzer().analyze_batch(texts) {
            Ok(results) => results,
            Err(error) => {
                return error_response(StatusCode::BAD_REQUEST, error.to_string(), None);
            }
        };
        state.metrics().texts_analyzed.inc_by(results.len() as f64);
        let stats = batch_stats(&results);
        debug!(total = stats.total, "sentiment batch analyzed");
        return Json(BatchResponse {
            ok: true,
            results: &results,
            stats,
            preview: preview(&results, limit),
        })
        .into_response();
    }

    error_response(
        StatusCode::BAD_REQUEST,
        "Please provide \"text\" (string) or \"texts\" (array)",
        None,
    )
}

/// レビュー配列の指定フィールドを分析し、各レビューに結果を付与する。
#[allow(clippy::cast_precision_loss)]
pub(crate) async fn reviews(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReviewsRequest>,
) -> Response {
    let batch = match canonical::normalize_batch(&payload.reviews) {
        Ok(batch) => batch,
        Err(error) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Please provide \"reviews\" array",
                Some(error.to_string()),
            );
        }
    };
    let text_field = payload
        .text_field
        .as_deref()
        .unwrap_or(Review::DEFAULT_TEXT_FIELD);

    let analyzed = analyze_reviews(state.analyzer(), &batch.reviews, text_field);
    state.metrics().texts_analyzed.inc_by(analyzed.len() as f64);
    let stats = batch_stats(analyzed.iter().map(|review| &review.sentiment));

    Json(ReviewsResponse {
        ok: true,
        count: analyzed.len(),
        reviews: &analyzed,
        preview: preview(&analyzed, state.config().preview_limit()),
        stats,
        errors: batch.errors,
    })
    .into_response()
}

/// 空文字列・null・false・0 は「指定なし」とみなす。
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
