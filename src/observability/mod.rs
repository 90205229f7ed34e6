pub(crate) mod metrics;
pub(crate) mod tracing;

use std::sync::Arc;

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};

pub use self::metrics::Metrics;

/// Telemetry（メトリクスとトレーシング）を管理する構造体。
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// 新しいTelemetryインスタンスを作成し、トレーシングとメトリクスを初期化する。
    ///
    /// # Errors
    /// トレーシングの初期化またはメトリクス登録に失敗した場合はエラーを返す。
    pub fn new() -> Result<Self> {
        tracing::init()?;
        Self::with_registry(Registry::new())
    }

    /// トレーシングには触れず、渡されたレジストリにメトリクスだけを登録する。
    ///
    /// # Errors
    /// メトリクス登録に失敗した場合はエラーを返す。
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let metrics = Arc::new(Metrics::new(&registry)?);
        Ok(Self {
            registry: Arc::new(registry),
            metrics,
        })
    }

    /// メトリクスへのアクセスを提供する。
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn metrics_arc(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// 準備完了チェックを記録する。
    pub fn record_ready_check(&self) {
        ::tracing::info!("service ready check recorded");
    }

    /// 生存チェックを記録する。
    pub fn record_live_check(&self) {
        ::tracing::debug!("service live check");
    }

    /// Prometheusメトリクスをレンダリングする。
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}
