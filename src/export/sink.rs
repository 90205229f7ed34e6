//! 生成済み CSV ファイルのアップロード先の抽象。
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// アップロード済みファイルのメタデータ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub created_at: String,
}

/// アップロードの失敗。エクスポート自体は失敗させない。
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload sink is disabled")]
    Disabled,
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upload endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode upload response: {0}")]
    Decode(String),
}

impl UploadError {
    /// 同じリクエストを再送して成功する見込みがあるか。
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => {
                error.is_timeout()
                    || error.is_connect()
                    || error.status().is_some_and(is_transient_status)
            }
            Self::Status { status, .. } => is_transient_status(*status),
            Self::Disabled | Self::Io { .. } | Self::Decode(_) => false,
        }
    }
}

/// ストレージ側の一時的な不調（5xx と 429）。
fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
pub trait UploadSink: Send + Sync {
    /// `path` のファイルを `desired_name` としてアップロードする。
    async fn upload(&self, path: &Path, desired_name: &str) -> Result<UploadedFile, UploadError>;

    fn is_enabled(&self) -> bool;
}
