use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::text::Locale;

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// アップロード先ストレージに必須の環境変数。
const UPLOAD_REQUIRED_VARS: [&str; 4] = [
    "UPLOAD_ENDPOINT",
    "UPLOAD_PROJECT_ID",
    "UPLOAD_API_KEY",
    "UPLOAD_BUCKET_ID",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    scratch_dir: PathBuf,
    preview_limit: usize,
    default_locale: Locale,
    upload_requested: bool,
    upload_endpoint: Option<String>,
    upload_project_id: Option<String>,
    upload_api_key: Option<String>,
    upload_bucket_id: Option<String>,
    upload_connect_timeout: Duration,
    upload_total_timeout: Duration,
    http_max_retries: usize,
    http_backoff_base_ms: u64,
    http_backoff_cap_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から Review Worker の設定値を読み込み、検証する。
    ///
    /// アップロード関連の値は `UPLOAD_ENABLED` が真の場合のみ意味を持つ。
    /// 必須値が欠けている場合でもエラーにはせず、アップロードを無効として扱う。
    ///
    /// # Errors
    /// 数値／アドレス／真偽値のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("REVIEW_WORKER_HTTP_BIND", "0.0.0.0:5000")?;
        let scratch_dir =
            PathBuf::from(env::var("REVIEW_SCRATCH_DIR").unwrap_or_else(|_| "tmp".to_string()));
        let preview_limit = parse_usize("REVIEW_PREVIEW_LIMIT", 10)?;
        let default_locale = env::var("REVIEW_DEFAULT_LOCALE")
            .map(|raw| Locale::from_code(&raw))
            .unwrap_or_default();

        // Blob storage upload settings
        let upload_requested = parse_bool("UPLOAD_ENABLED", false)?;
        let upload_endpoint = optional_var("UPLOAD_ENDPOINT");
        let upload_project_id = optional_var("UPLOAD_PROJECT_ID");
        let upload_api_key = optional_var("UPLOAD_API_KEY");
        let upload_bucket_id = optional_var("UPLOAD_BUCKET_ID");
        let upload_connect_timeout = parse_duration_ms("UPLOAD_CONNECT_TIMEOUT_MS", 3000)?;
        let upload_total_timeout = parse_duration_ms("UPLOAD_TOTAL_TIMEOUT_MS", 30000)?;

        // Retry settings (exponential backoff + jitter)
        let http_max_retries = parse_usize("HTTP_MAX_RETRIES", 3)?;
        let http_backoff_base_ms = parse_u64("HTTP_BACKOFF_BASE_MS", 250)?;
        let http_backoff_cap_ms = parse_u64("HTTP_BACKOFF_CAP_MS", 10000)?;

        Ok(Self {
            http_bind,
            scratch_dir,
            preview_limit,
            default_locale,
            upload_requested,
            upload_endpoint,
            upload_project_id,
            upload_api_key,
            upload_bucket_id,
            upload_connect_timeout,
            upload_total_timeout,
            http_max_retries,
            http_backoff_base_ms,
            http_backoff_cap_ms,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.scratch_dir
    }

    #[must_use]
    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }

    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// `UPLOAD_ENABLED` で明示的にアップロードが要求されているか。
    #[must_use]
    pub fn upload_requested(&self) -> bool {
        self.upload_requested
    }

    /// アップロード要求時に欠けている必須環境変数の一覧。
    #[must_use]
    pub fn upload_missing_vars(&self) -> Vec<&'static str> {
        let values = [
            &self.upload_endpoint,
            &self.upload_project_id,
            &self.upload_api_key,
            &self.upload_bucket_id,
        ];
        UPLOAD_REQUIRED_VARS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect()
    }

    /// 要求され、かつ必須値がすべて揃っている場合のみアップロードが有効。
    #[must_use]
    pub fn upload_enabled(&self) -> bool {
        self.upload_requested && self.upload_missing_vars().is_empty()
    }

    #[must_use]
    pub fn upload_endpoint(&self) -> Option<&str> {
        self.upload_endpoint.as_deref()
    }

    #[must_use]
    pub fn upload_project_id(&self) -> Option<&str> {
        self.upload_project_id.as_deref()
    }

    #[must_use]
    pub fn upload_api_key(&self) -> Option<&str> {
        self.upload_api_key.as_deref()
    }

    #[must_use]
    pub fn upload_bucket_id(&self) -> Option<&str> {
        self.upload_bucket_id.as_deref()
    }

    #[must_use]
    pub fn upload_connect_timeout(&self) -> Duration {
        self.upload_connect_timeout
    }

    #[must_use]
    pub fn upload_total_timeout(&self) -> Duration {
        self.upload_total_timeout
    }

    #[must_use]
    pub fn http_max_retries(&self) -> usize {
        self.http_max_retries
    }

    #[must_use]
    pub fn http_backoff_base_ms(&self) -> u64 {
        self.http_backoff_base_ms
    }

    #[must_use]
    pub fn http_backoff_cap_ms(&self) -> u64 {
        self.http_backoff_cap_ms
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<SocketAddr>()
        .map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    parse_u64(name, default_ms).map(Duration::from_millis)
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("invalid boolean value: {raw}"),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn set_env(name: &str, value: &str) {
        // SAFETY: tests run sequentially under ENV_MUTEX and assign valid UTF-8 values.
        unsafe {
            env::set_var(name, value);
        }
    }

    pub(crate) fn remove_env(name: &str) {
        // SAFETY: tests run sequentially under ENV_MUTEX and clean up deterministic keys.
        unsafe {
            env::remove_var(name);
        }
    }

    pub(crate) fn reset_env() {
        remove_env("REVIEW_WORKER_HTTP_BIND");
        remove_env("REVIEW_SCRATCH_DIR");
        remove_env("REVIEW_PREVIEW_LIMIT");
        remove_env("REVIEW_DEFAULT_LOCALE");
        remove_env("UPLOAD_ENABLED");
        remove_env("UPLOAD_CONNECT_TIMEOUT_MS");
        remove_env("UPLOAD_TOTAL_TIMEOUT_MS");
        remove_env("HTTP_MAX_RETRIES");
        remove_env("HTTP_BACKOFF_BASE_MS");
        remove_env("HTTP_BACKOFF_CAP_MS");
        for name in UPLOAD_REQUIRED_VARS {
            remove_env(name);
        }
    }

    #[test]
    fn from_env_uses_defaults_when_optional_missing() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();

        let config = Config::from_env().expect("config should load");

        assert_eq!(config.http_bind(), "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.scratch_dir(), std::path::Path::new("tmp"));
        assert_eq!(config.preview_limit(), 10);
        assert_eq!(config.default_locale(), Locale::Indonesian);
        assert!(!config.upload_requested());
        assert!(!config.upload_enabled());
        assert_eq!(config.upload_connect_timeout(), Duration::from_millis(3000));
        assert_eq!(config.upload_total_timeout(), Duration::from_millis(30000));
        assert_eq!(config.http_max_retries(), 3);
        assert_eq!(config.http_backoff_base_ms(), 250);
        assert_eq!(config.http_backoff_cap_ms(), 10000);
    }

    #[test]
    fn from_env_overrides_values() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("REVIEW_WORKER_HTTP_BIND", "127.0.0.1:8088");
        set_env("REVIEW_SCRATCH_DIR", "/var/tmp/reviews");
        set_env("REVIEW_PREVIEW_LIMIT", "25");
        set_env("REVIEW_DEFAULT_LOCALE", "en");
        set_env("UPLOAD_ENABLED", "true");
        set_env("UPLOAD_ENDPOINT", "https://storage.example.com/v1");
        set_env("UPLOAD_PROJECT_ID", "project-1");
        set_env("UPLOAD_API_KEY", "secret");
        set_env("UPLOAD_BUCKET_ID", "reviews");
        set_env("UPLOAD_TOTAL_TIMEOUT_MS", "5000");
        set_env("HTTP_MAX_RETRIES", "5");

        let config = Config::from_env().expect("config should load");

        assert_eq!(config.http_bind(), "127.0.0.1:8088".parse().unwrap());
        assert_eq!(config.scratch_dir(), std::path::Path::new("/var/tmp/reviews"));
        assert_eq!(config.preview_limit(), 25);
        assert_eq!(config.default_locale(), Locale::English);
        assert!(config.upload_enabled());
        assert_eq!(
            config.upload_endpoint(),
            Some("https://storage.example.com/v1")
        );
        assert_eq!(config.upload_bucket_id(), Some("reviews"));
        assert_eq!(config.upload_total_timeout(), Duration::from_millis(5000));
        assert_eq!(config.http_max_retries(), 5);

        reset_env();
    }

    #[test]
    fn upload_is_disabled_when_required_values_missing() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("UPLOAD_ENABLED", "yes");
        set_env("UPLOAD_ENDPOINT", "https://storage.example.com/v1");
        set_env("UPLOAD_API_KEY", "  ");

        let config = Config::from_env().expect("config should load");

        assert!(config.upload_requested());
        assert!(!config.upload_enabled());
        assert_eq!(
            config.upload_missing_vars(),
            vec!["UPLOAD_PROJECT_ID", "UPLOAD_API_KEY", "UPLOAD_BUCKET_ID"]
        );

        reset_env();
    }

    #[test]
    fn from_env_errors_on_invalid_boolean() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("UPLOAD_ENABLED", "maybe");

        let error = Config::from_env().expect_err("invalid boolean should fail");

        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "UPLOAD_ENABLED",
                ..
            }
        ));

        reset_env();
    }
}
