use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    api::{ApiJson, error_response, preview},
    app::AppState,
    export::CsvReport,
    review::{AppInfo, Review},
    sentiment::{AnalyzedReview, BatchStats, RatingStats, analyze_reviews, batch_stats, rating_stats},
    source::{MalformedRecordError, SourceKind},
};

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(default)]
    app: AppInfo,
    #[serde(default)]
    records: Value,
    #[serde(default)]
    rating: Option<Value>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportResponse<'a> {
    ok: bool,
    job_id: Uuid,
    source: SourceKind,
    count: usize,
    reviews: &'a [AnalyzedReview],
    preview: &'a [AnalyzedReview],
    stats: BatchStats,
    rating_stats: RatingStats,
    errors: Vec<MalformedRecordError>,
    csv: CsvReport,
}

/// 評価による絞り込み条件。`"all"` または 1〜5。
fn parse_rating_filter(raw: Option<&Value>) -> Result<Option<i64>, String> {
    let invalid = || "rating must be \"all\" or a value from 1 to 5".to_string();
    let stars = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) if text.trim().eq_ignore_ascii_case("all") => return Ok(None),
        Some(Value::String(text)) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid)?,
        Some(_) => return Err(invalid()),
    };
    if (1..=5).contains(&stars) {
        Ok(Some(stars))
    } else {
        Err(invalid())
    }
}

/// レコードを正規化・分析し、CSV を生成してアップロード（または本文返却）する。
#[allow(clippy::cast_precision_loss)]
pub(crate) async fn export(
    State(state): State<AppState>,
    Path(source): Path<String>,
    ApiJson(payload): ApiJson<ExportRequest>,
) -> Response {
    let source = match source.parse::<SourceKind>() {
        Ok(source) => source,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string(), None),
    };

    // SNS はクエリ文字列（name）、ストアはアプリID で対象を識別する。
    let identifier = match source {
        SourceKind::Twitter => &payload.app.name,
        SourceKind::PlayStore | SourceKind::AppStore => &payload.app.id,
    };
    if identifier.trim().is_empty() {
        let field = if source == SourceKind::Twitter {
            "app.name (search query) is required"
        } else {
            "app.id is required"
        };
        return error_response(StatusCode::BAD_REQUEST, field, None);
    }

    let rating_filter = match parse_rating_filter(payload.rating.as_ref()) {
        Ok(filter) => filter,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message, None),
    };

    let records = match (payload.limit, payload.records) {
        (Some(limit), Value::Array(mut items)) => {
            items.truncate(limit);
            Value::Array(items)
        }
        (_, records) => records,
    };

    let batch = match source.normalize_batch(&records) {
        Ok(batch) => batch,
        Err(error) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Please provide \"records\" array",
                Some(error.to_string()),
            );
        }
    };
    let metrics = state.metrics();
    metrics.records_normalized.inc_by(batch.reviews.len() as f64);
    metrics.records_rejected.inc_by(batch.errors.len() as f64);

    let total = batch.reviews.len();
    let reviews: Vec<Review> = match rating_filter {
        Some(stars) => batch
            .reviews
            .into_iter()
            .filter(|review| review.rating == stars)
            .collect(),
        None => batch.reviews,
    };
    info!(%source, app_id = %payload.app.id, kept = reviews.len(), total, "records normalized");

    let analyzed = analyze_reviews(state.analyzer(), &reviews, Review::DEFAULT_TEXT_FIELD);
    metrics.texts_analyzed.inc_by(analyzed.len() as f64);
    let stats = batch_stats(analyzed.iter().map(|review| &review.sentiment));

    let outcome = match state.exporter().export(source, &payload.app, &reviews).await {
        Ok(outcome) => outcome,
        Err(error) => {
            error!(%source, error = ?error, "export failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export reviews",
                Some(format!("{error:#}")),
            );
        }
    };

    Json(ExportResponse {
        ok: true,
        job_id: outcome.job_id,
        source,
        count: analyzed.len(),
        reviews: &analyzed,
        preview: preview(&analyzed, state.config().preview_limit()),
        stats,
        rating_stats: rating_stats(&reviews),
        errors: batch.errors,
        csv: outcome.csv_report(),
    })
    .into_response()
}
