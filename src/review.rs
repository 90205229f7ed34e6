/// ソースに依存しない正規化済みレビューのモデル。
///
/// アダプタが一度設定した `rating` は後段で書き換えない。
/// 感情分析の結果は `AnalyzedReview` として別フィールドに付与する。
use serde::{Deserialize, Serialize};

/// 正規化済みレビュー。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_name: String,
    /// ソース側の日付文字列をそのまま保持する。
    pub date: String,
    /// 1〜5 の範囲外でも加工せずに保持する。
    pub rating: i64,
    pub review_text: String,
    #[serde(flatten)]
    pub extras: ReviewExtras,
}

/// ソース固有の任意フィールド。存在しないものは出力しない。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbs_up: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Review {
    /// 既定で感情分析に使うテキストフィールド名。
    pub const DEFAULT_TEXT_FIELD: &'static str = "reviewText";

    /// JSON 上のフィールド名でテキストを取り出す。存在しなければ空文字列。
    #[must_use]
    pub fn text_field(&self, field: &str) -> &str {
        fn extra(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("")
        }

        match field {
            "id" => &self.id,
            "userName" => &self.user_name,
            "date" => &self.date,
            "reviewText" => &self.review_text,
            "title" => extra(&self.extras.title),
            "version" => extra(&self.extras.version),
            "replyText" => extra(&self.extras.reply_text),
            "replyDate" => extra(&self.extras.reply_date),
            "author" => extra(&self.extras.author),
            "url" => extra(&self.extras.url),
            _ => "",
        }
    }
}

/// エクスポート対象のアプリ（SNS の場合は検索クエリ）の情報。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, alias = "appId")]
    pub id: String,
}

impl AppInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}
