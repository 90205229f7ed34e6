//! CSV の生成、アップロード、一時ファイルの後始末を1件のエクスポートとして扱う。
//!
//! 一時ファイルはアップロードの成否に関わらず必ず削除する。
//! アップロードしなかった場合は CSV 本文を呼び出し元へ返す。
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    observability::Metrics,
    review::{AppInfo, Review},
    source::SourceKind,
};

use super::{
    sink::{UploadSink, UploadedFile},
    tabular::{columns_for, to_csv},
};

const SKIPPED_MESSAGE: &str = "Upload is disabled. CSV content returned in response.";

/// エクスポートの進行段階。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportPhase {
    Generated,
    UploadAttempted,
    UploadSkipped,
    Cleaned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(UploadedFile),
    Skipped,
    Failed { message: String },
}

/// 1件のエクスポート結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub job_id: Uuid,
    pub file_name: String,
    pub content: String,
    pub upload: UploadOutcome,
    pub phases: Vec<ExportPhase>,
}

/// API 応答用の CSV 情報。アップロード済みならファイル情報、そうでなければ本文を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvReport {
    pub uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExportOutcome {
    #[must_use]
    pub fn uploaded(&self) -> Option<&UploadedFile> {
        match &self.upload {
            UploadOutcome::Uploaded(file) => Some(file),
            UploadOutcome::Skipped | UploadOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn csv_report(&self) -> CsvReport {
        match &self.upload {
            UploadOutcome::Uploaded(file) => CsvReport {
                uploaded: true,
                file_id: Some(file.id.clone()),
                file_name: Some(file.name.clone()),
                download_url: Some(file.url.clone()),
                size: Some(file.size),
                content: None,
                message: None,
            },
            UploadOutcome::Skipped => self.inline_report(SKIPPED_MESSAGE.to_string()),
            UploadOutcome::Failed { message } => self.inline_report(format!(
                "Upload failed: {message}. CSV content returned in response."
            )),
        }
    }

    fn inline_report(&self, message: String) -> CsvReport {
        CsvReport {
            uploaded: false,
            file_id: None,
            file_name: None,
            download_url: None,
            size: None,
            content: Some(self.content.clone()),
            message: Some(message),
        }
    }
}

/// エクスポートの調停役。アップロード先の有無は構築時に決まる。
#[derive(Clone)]
pub struct ExportCoordinator {
    scratch_dir: PathBuf,
    sink: Option<Arc<dyn UploadSink>>,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for ExportCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportCoordinator")
            .field("scratch_dir", &self.scratch_dir)
            .field("upload_enabled", &self.upload_enabled())
            .finish_non_exhaustive()
    }
}

impl ExportCoordinator {
    pub fn new(
        scratch_dir: impl Into<PathBuf>,
        sink: Option<Arc<dyn UploadSink>>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            sink,
            metrics,
        }
    }

    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    #[must_use]
    pub fn upload_enabled(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.is_enabled())
    }

    /// CSV を一時ディレクトリに書き出し、可能ならアップロードし、最後に削除する。
    ///
    /// アップロードの失敗は結果の `upload` に記録され、エラーにはならない。
    ///
    /// # Errors
    /// 一時ディレクトリの作成またはファイルの書き込みに失敗した場合はエラーを返す。
    pub async fn export(
        &self,
        source: SourceKind,
        app: &AppInfo,
        reviews: &[Review],
    ) -> Result<ExportOutcome> {
        let started = Instant::now();
        let job_id = Uuid::new_v4();
        let target = match source {
            SourceKind::Twitter => &app.name,
            SourceKind::PlayStore | SourceKind::AppStore => &app.id,
        };
        let file_name = format!("{source}-{}-{job_id}.csv", sanitize_file_component(target));
        let path = self.scratch_dir.join(&file_name);
        let content = to_csv(reviews, app, columns_for(source));

        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create scratch directory {}",
                    self.scratch_dir.display()
                )
            })?;
        if let Err(error) = tokio::fs::write(&path, content.as_bytes()).await {
            self.cleanup(&path).await;
            return Err(error)
                .with_context(|| format!("failed to write export file {}", path.display()));
        }

        let mut phases = vec![ExportPhase::Generated];
        self.metrics.exports_generated.inc();
        debug!(%job_id, %source, file = %file_name, rows = reviews.len(), "export generated");

        let upload = match self.sink.as_ref().filter(|sink| sink.is_enabled()) {
            Some(sink) => {
                phases.push(ExportPhase::UploadAttempted);
                self.upload(&**sink, &path, &file_name, job_id).await
            }
            None => {
                phases.push(ExportPhase::UploadSkipped);
                self.metrics.uploads_skipped.inc();
                UploadOutcome::Skipped
            }
        };

        self.cleanup(&path).await;
        phases.push(ExportPhase::Cleaned);

        let elapsed = started.elapsed();
        self.metrics.export_duration.observe(elapsed.as_secs_f64());
        info!(
            %job_id,
            %source,
            rows = reviews.len(),
            uploaded = matches!(upload, UploadOutcome::Uploaded(_)),
            elapsed_ms = elapsed.as_millis(),
            "export finished"
        );

        Ok(ExportOutcome {
            job_id,
            file_name,
            content,
            upload,
            phases,
        })
    }

    async fn upload(
        &self,
        sink: &dyn UploadSink,
        path: &Path,
        file_name: &str,
        job_id: Uuid,
    ) -> UploadOutcome {
        let timer = self.metrics.upload_duration.start_timer();
        let result = sink.upload(path, file_name).await;
        timer.observe_duration();

        match result {
            Ok(file) => {
                self.metrics.uploads_succeeded.inc();
                info!(%job_id, file_id = %file.id, size = file.size, "export uploaded");
                UploadOutcome::Uploaded(file)
            }
            Err(error) => {
                self.metrics.uploads_failed.inc();
                warn!(%job_id, error = %error, "export upload failed; returning content inline");
                UploadOutcome::Failed {
                    message: error.to_string(),
                }
            }
        }
    }

    /// 一時ファイルを削除する。既に存在しない場合は何もしない。
    async fn cleanup(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                self.metrics.cleanup_failures.inc();
                warn!(path = %path.display(), error = %error, "failed to remove scratch file");
            }
        }
    }
}

/// ファイル名に使えない文字を `_` に置き換える。
fn sanitize_file_component(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "unknown".to_string()
    } else {
        sanitized
    }
}
