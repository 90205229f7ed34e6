use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    api,
    clients::{StorageClient, StorageConfig},
    config::Config,
    export::{ExportCoordinator, UploadSink},
    observability::{Metrics, Telemetry},
    sentiment::{Lexicon, SentimentAnalyzer},
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    analyzer: SentimentAnalyzer,
    exporter: ExportCoordinator,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn metrics(&self) -> &Metrics {
        self.registry.telemetry.metrics()
    }

    pub(crate) fn config(&self) -> &Config {
        &self.registry.config
    }

    pub(crate) fn analyzer(&self) -> &SentimentAnalyzer {
        &self.registry.analyzer
    }

    pub(crate) fn exporter(&self) -> &ExportCoordinator {
        &self.registry.exporter
    }
}

impl ComponentRegistry {
    /// 構成情報と依存をまとめて初期化し、アプリケーションの共有レジストリを構築する。
    ///
    /// アップロードが要求されていても必須値が欠けている場合は、警告を出して無効のまま起動する。
    ///
    /// # Errors
    /// Telemetry の初期化や HTTP クライアント構築が失敗した場合はエラーを返す。
    pub fn build(config: Config) -> Result<Self> {
        let telemetry = Telemetry::new()?;

        if config.upload_requested() && !config.upload_enabled() {
            warn!(
                missing = ?config.upload_missing_vars(),
                "upload requested but storage settings are incomplete; upload disabled"
            );
        }

        let sink = match StorageConfig::from_config(&config) {
            Some(storage_config) => {
                let client = StorageClient::new(storage_config)
                    .context("failed to build storage client")?;
                info!("storage upload enabled");
                Some(Arc::new(client) as Arc<dyn UploadSink>)
            }
            None => {
                info!("storage upload disabled");
                None
            }
        };

        Ok(Self::from_parts(config, telemetry, sink))
    }

    /// 初期化済みの部品からレジストリを組み立てる。
    pub(crate) fn from_parts(
        config: Config,
        telemetry: Telemetry,
        sink: Option<Arc<dyn UploadSink>>,
    ) -> Self {
        let analyzer = SentimentAnalyzer::new(Arc::new(Lexicon::builtin()));
        let exporter = ExportCoordinator::new(config.scratch_dir(), sink, telemetry.metrics_arc());
        Self {
            config: Arc::new(config),
            telemetry,
            analyzer,
            exporter,
        }
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn upload_enabled(&self) -> bool {
        self.exporter.upload_enabled()
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use prometheus::Registry;

    use super::*;
    use crate::config::{ENV_MUTEX, tests::reset_env, tests::set_env};

    /// 既定設定と指定の一時ディレクトリで状態を組み立てる。
    pub(crate) fn state_with(scratch_dir: &Path, sink: Option<Arc<dyn UploadSink>>) -> AppState {
        let config = {
            let _lock = ENV_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            reset_env();
            set_env("REVIEW_SCRATCH_DIR", &scratch_dir.to_string_lossy());
            set_env("REVIEW_PREVIEW_LIMIT", "2");
            let config = Config::from_env().expect("config loads");
            reset_env();
            config
        };
        let telemetry = Telemetry::with_registry(Registry::new()).expect("telemetry");
        AppState::new(ComponentRegistry::from_parts(config, telemetry, sink))
    }
}
