/// Prometheusメトリクス定義。
use prometheus::{
    Counter, Histogram, Registry, register_counter_with_registry,
    register_histogram_with_registry,
};

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub records_normalized: Counter,
    pub records_rejected: Counter,
    pub texts_analyzed: Counter,
    pub exports_generated: Counter,
    pub uploads_succeeded: Counter,
    pub uploads_failed: Counter,
    pub uploads_skipped: Counter,
    pub cleanup_failures: Counter,

    // ヒストグラム
    pub export_duration: Histogram,
    pub upload_duration: Histogram,
}

impl Metrics {
    /// 指定したレジストリにメトリクスを登録する。
    ///
    /// # Errors
    /// 同名のメトリクスが既に登録されている場合はエラーを返す。
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            records_normalized: register_counter_with_registry!(
                "review_records_normalized_total",
                "Total number of raw records normalized into reviews",
                registry
            )?,
            records_rejected: register_counter_with_registry!(
                "review_records_rejected_total",
                "Total number of malformed raw records skipped",
                registry
            )?,
            texts_analyzed: register_counter_with_registry!(
                "review_texts_analyzed_total",
                "Total number of texts scored for sentiment",
                registry
            )?,
            exports_generated: register_counter_with_registry!(
                "review_exports_generated_total",
                "Total number of CSV exports generated",
                registry
            )?,
            uploads_succeeded: register_counter_with_registry!(
                "review_uploads_succeeded_total",
                "Total number of CSV uploads that succeeded",
                registry
            )?,
            uploads_failed: register_counter_with_registry!(
                "review_uploads_failed_total",
                "Total number of CSV uploads that failed",
                registry
            )?,
            uploads_skipped: register_counter_with_registry!(
                "review_uploads_skipped_total",
                "Total number of exports without an upload sink",
                registry
            )?,
            cleanup_failures: register_counter_with_registry!(
                "review_scratch_cleanup_failures_total",
                "Total number of scratch files that could not be removed",
                registry
            )?,
            export_duration: register_histogram_with_registry!(
                "review_export_duration_seconds",
                "Time spent generating, uploading and cleaning up one export",
                vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0],
                registry
            )?,
            upload_duration: register_histogram_with_registry!(
                "review_upload_duration_seconds",
                "Time spent uploading one CSV file including retries",
                vec![0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0],
                registry
            )?,
        })
    }
}
