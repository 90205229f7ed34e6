use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiJson, error_response},
    app::AppState,
    sentiment::SentimentResult,
    text::{Locale, PreprocessOptions, TextStats, preprocess, text_stats},
};

#[derive(Debug, Deserialize)]
pub(crate) struct PredictRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default = "default_preprocess")]
    preprocess: bool,
    #[serde(default)]
    lang: Option<Locale>,
}

fn default_preprocess() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct PredictInput<'a> {
    original: &'a str,
    processed: &'a str,
    stats: TextStats,
}

#[derive(Debug, Serialize)]
struct PredictResponse<'a> {
    ok: bool,
    input: PredictInput<'a>,
    prediction: SentimentResult,
}

/// 1件のテキストを（必要なら前処理してから）分析する。統計は元テキストに対して求める。
pub(crate) async fn predict(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PredictRequest>,
) -> Response {
    let Some(text) = payload.text.filter(|text| !text.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Text is required", None);
    };

    let locale = payload
        .lang
        .unwrap_or_else(|| state.config().default_locale());
    let processed = if payload.preprocess {
        preprocess(&text, &PreprocessOptions::for_locale(locale))
    } else {
        text.clone()
    };

    let prediction = state.analyzer().analyze(&processed);
    state.metrics().texts_analyzed.inc();

    Json(PredictResponse {
        ok: true,
        input: PredictInput {
            original: &text,
            processed: &processed,
            stats: text_stats(&text),
        },
        prediction,
    })
    .into_response()
}
