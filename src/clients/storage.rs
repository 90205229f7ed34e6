/// Blobストレージ（Appwrite互換API）へのCSVアップロードクライアント。
///
/// 一時的な失敗（タイムアウト・接続失敗・5xx・429）のみ、上限付きで再送します。
use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::Config,
    export::{UploadError, UploadSink, UploadedFile},
};

/// ストレージが返すファイルメタデータ。
#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(rename = "$id")]
    id: String,
    name: String,
    #[serde(rename = "sizeOriginal", default)]
    size_original: u64,
    #[serde(rename = "$createdAt", default)]
    created_at: String,
}

/// アップロードの再送方針。
///
/// `max_attempts` は初回を含む総試行回数。待ち時間は
/// `min(base * 2^(attempt-1), cap)` を上限とする一様乱数（full jitter）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UploadRetryPolicy {
    pub(crate) max_attempts: usize,
    pub(crate) base: Duration,
    pub(crate) cap: Duration,
}

impl UploadRetryPolicy {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.http_max_retries().max(1),
            base: Duration::from_millis(config.http_backoff_base_ms()),
            cap: Duration::from_millis(config.http_backoff_cap_ms()),
        }
    }

    /// `attempt` 回目（1始まり）が `error` で失敗したとき、再送前に待つ時間。
    /// 再送しない場合は `None`。
    pub(crate) fn next_delay(&self, attempt: usize, error: &UploadError) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }
        let ceiling = u64::try_from(self.ceiling(attempt).as_millis()).unwrap_or(u64::MAX);
        Some(Duration::from_millis(rand::rng().random_range(0..=ceiling)))
    }

    fn ceiling(&self, attempt: usize) -> Duration {
        let exponent = u32::try_from(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX)
            .min(31);
        self.base.saturating_mul(1_u32 << exponent).min(self.cap)
    }
}

/// ストレージクライアントの設定。
#[derive(Debug, Clone)]
pub(crate) struct StorageConfig {
    pub(crate) endpoint: String,
    pub(crate) project_id: String,
    pub(crate) api_key: String,
    pub(crate) bucket_id: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) total_timeout: Duration,
    pub(crate) retry: UploadRetryPolicy,
}

impl StorageConfig {
    /// アップロードが有効な場合のみ設定を組み立てる。
    pub(crate) fn from_config(config: &Config) -> Option<Self> {
        if !config.upload_enabled() {
            return None;
        }
        Some(Self {
            endpoint: config.upload_endpoint()?.trim_end_matches('/').to_string(),
            project_id: config.upload_project_id()?.to_string(),
            api_key: config.upload_api_key()?.to_string(),
            bucket_id: config.upload_bucket_id()?.to_string(),
            connect_timeout: config.upload_connect_timeout(),
            total_timeout: config.upload_total_timeout(),
            retry: UploadRetryPolicy::from_config(config),
        })
    }
}

/// ストレージとの通信を管理するクライアント。
#[derive(Debug, Clone)]
pub(crate) struct StorageClient {
    client: Client,
    config: StorageConfig,
}

impl StorageClient {
    /// 新しいストレージクライアントを作成する。
    ///
    /// # Errors
    /// HTTPクライアントの構築に失敗した場合はエラーを返します。
    pub(crate) fn new(config: StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build storage HTTP client")?;

        Ok(Self { client, config })
    }

    fn files_url(&self) -> String {
        format!(
            "{}/storage/buckets/{}/files",
            self.config.endpoint, self.config.bucket_id
        )
    }

    fn download_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/download?project={}",
            self.config.endpoint, self.config.bucket_id, file_id, self.config.project_id
        )
    }

    /// 1回分のアップロードリクエスト。
    async fn send_once(&self, bytes: &[u8], file_name: &str) -> Result<FileResponse, UploadError> {
        let part = Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().text("fileId", "unique()").part("file", part);

        let response = self
            .client
            .post(self.files_url())
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status { status, body });
        }

        response
            .json::<FileResponse>()
            .await
            .map_err(|error| UploadError::Decode(error.to_string()))
    }
}

#[async_trait]
impl UploadSink for StorageClient {
    async fn upload(&self, path: &Path, desired_name: &str) -> Result<UploadedFile, UploadError> {
        if !self.is_enabled() {
            return Err(UploadError::Disabled);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            debug!(attempt, file = desired_name, size = bytes.len(), "uploading file");
            let error = match self.send_once(&bytes, desired_name).await {
                Ok(response) => break response,
                Err(error) => error,
            };
            let Some(delay) = self.config.retry.next_delay(attempt, &error) else {
                return Err(error);
            };
            warn!(
                attempt,
                max_attempts = self.config.retry.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "upload failed, retrying"
            );
            tokio::time::sleep(delay).await;
        };

        Ok(UploadedFile {
            url: self.download_url(&response.id),
            id: response.id,
            name: response.name,
            size: response.size_original,
            created_at: response.created_at,
        })
    }

    fn is_enabled(&self) -> bool {
        !self.config.endpoint.is_empty() && !self.config.bucket_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: String, max_attempts: usize) -> StorageConfig {
        StorageConfig {
            endpoint,
            project_id: "project-1".to_string(),
            api_key: "secret".to_string(),
            bucket_id: "reviews".to_string(),
            connect_timeout: Duration::from_secs(3),
            total_timeout: Duration::from_secs(10),
            retry: UploadRetryPolicy {
                max_attempts,
                base: Duration::from_millis(1),
                cap: Duration::from_millis(5),
            },
        }
    }

    fn unavailable() -> UploadError {
        UploadError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        }
    }

    #[rstest]
    #[case(1, 100)]
    #[case(2, 200)]
    #[case(3, 400)]
    #[case(6, 1_000)]
    #[case(500, 1_000)]
    fn retry_delay_stays_under_doubling_ceiling(#[case] attempt: usize, #[case] ceiling_ms: u64) {
        let policy = UploadRetryPolicy {
            max_attempts: usize::MAX,
            base: Duration::from_millis(100),
            cap: Duration::from_secs(1),
        };

        for _ in 0..20 {
            let delay = policy.next_delay(attempt, &unavailable()).expect("retries");
            assert!(delay <= Duration::from_millis(ceiling_ms), "{delay:?}");
        }
    }

    #[test]
    fn retry_stops_at_last_attempt_and_on_permanent_errors() {
        let policy = UploadRetryPolicy {
            max_attempts: 3,
            base: Duration::from_millis(1),
            cap: Duration::from_millis(5),
        };

        assert!(policy.next_delay(1, &unavailable()).is_some());
        assert!(policy.next_delay(2, &unavailable()).is_some());
        assert!(policy.next_delay(3, &unavailable()).is_none());
        assert!(policy.next_delay(1, &UploadError::Decode("eof".into())).is_none());
    }

    fn csv_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), "App Name,App ID\nA,a\n").expect("write csv");
        file
    }

    #[tokio::test]
    async fn upload_posts_multipart_and_builds_download_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/storage/buckets/reviews/files"))
            .and(header("X-Appwrite-Project", "project-1"))
            .and(header("X-Appwrite-Key", "secret"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "$id": "abc123",
                "name": "playstore-a-job.csv",
                "sizeOriginal": 20,
                "$createdAt": "2024-05-01T00:00:00.000+00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StorageClient::new(test_config(format!("{}/v1", server.uri()), 3))
            .expect("client should build");
        let file = csv_file();

        let uploaded = client
            .upload(file.path(), "playstore-a-job.csv")
            .await
            .expect("upload should succeed");

        assert_eq!(uploaded.id, "abc123");
        assert_eq!(uploaded.size, 20);
        assert_eq!(
            uploaded.url,
            format!(
                "{}/v1/storage/buckets/reviews/files/abc123/download?project=project-1",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_attempts_run_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/storage/buckets/reviews/files"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = StorageClient::new(test_config(format!("{}/v1", server.uri()), 3))
            .expect("client should build");
        let file = csv_file();

        let error = client.upload(file.path(), "x.csv").await.unwrap_err();

        assert!(matches!(error, UploadError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/storage/buckets/reviews/files"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = StorageClient::new(test_config(format!("{}/v1", server.uri()), 3))
            .expect("client should build");
        let file = csv_file();

        let error = client.upload(file.path(), "x.csv").await.unwrap_err();

        match error {
            UploadError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "invalid key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_response_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = StorageClient::new(test_config(format!("{}/v1", server.uri()), 1))
            .expect("client should build");
        let file = csv_file();

        let error = client.upload(file.path(), "x.csv").await.unwrap_err();
        assert!(matches!(error, UploadError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let client = StorageClient::new(test_config("http://127.0.0.1:9".to_string(), 1))
            .expect("client should build");

        let error = client
            .upload(Path::new("/definitely/not/here.csv"), "x.csv")
            .await
            .unwrap_err();
        assert!(matches!(error, UploadError::Io { .. }));
    }

    #[tokio::test]
    async fn empty_endpoint_is_disabled() {
        let client =
            StorageClient::new(test_config(String::new(), 1)).expect("client should build");
        assert!(!client.is_enabled());

        let file = csv_file();
        let error = client.upload(file.path(), "x.csv").await.unwrap_err();
        assert!(matches!(error, UploadError::Disabled));
    }
}
