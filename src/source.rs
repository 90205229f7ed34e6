//! ソース別の生レコードを正規化済みレビューへ変換するアダプタ群。
//!
//! 各アダプタは独立した純粋関数で、`SourceKind` のタグで選択される。
//! 共通するのはフィールド読み出しのヘルパーのみ。
pub mod appstore;
pub mod canonical;
pub mod playstore;
pub mod twitter;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    error::{InvalidInputError, json_kind},
    review::Review,
};

/// 生レコード1件の形式。
pub type RawRecord = Map<String, Value>;

/// レビューの取得元。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    PlayStore,
    AppStore,
    Twitter,
}

/// オブジェクトではないレコードを受け取った。そのレコードのみが失敗扱いになる。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("record {index} is malformed: expected an object, found {found}")]
#[serde(rename_all = "camelCase")]
pub struct MalformedRecordError {
    pub index: usize,
    pub found: &'static str,
}

/// 正規化の結果。成功したレビューと、スキップしたレコードのエラーを併せて返す。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBatch {
    pub reviews: Vec<Review>,
    pub errors: Vec<MalformedRecordError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported review source: {0}")]
pub struct UnknownSourceError(pub String);

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::PlayStore, Self::AppStore, Self::Twitter];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayStore => "playstore",
            Self::AppStore => "appstore",
            Self::Twitter => "twitter",
        }
    }

    /// 生レコード1件を正規化する。
    ///
    /// # Errors
    /// レコードが JSON オブジェクトでない場合は [`MalformedRecordError`] を返す。
    pub fn normalize(self, raw: &Value, index: usize) -> Result<Review, MalformedRecordError> {
        let record = as_record(raw, index)?;
        Ok(match self {
            Self::PlayStore => playstore::normalize(record, index),
            Self::AppStore => appstore::normalize(record, index),
            Self::Twitter => twitter::normalize(record, index),
        })
    }

    /// レコード配列をまとめて正規化する。不正なレコードはスキップして報告する。
    ///
    /// # Errors
    /// `records` が配列でない場合は [`InvalidInputError`] を返す。
    pub fn normalize_batch(self, records: &Value) -> Result<NormalizedBatch, InvalidInputError> {
        collect_batch("records", records, |raw, index| self.normalize(raw, index))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSourceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownSourceError(raw.to_string()))
    }
}

pub(crate) fn as_record(raw: &Value, index: usize) -> Result<&RawRecord, MalformedRecordError> {
    raw.as_object().ok_or(MalformedRecordError {
        index,
        found: json_kind(raw),
    })
}

pub(crate) fn collect_batch<F>(
    field: &'static str,
    records: &Value,
    mut normalize: F,
) -> Result<NormalizedBatch, InvalidInputError>
where
    F: FnMut(&Value, usize) -> Result<Review, MalformedRecordError>,
{
    let items = records
        .as_array()
        .ok_or_else(|| InvalidInputError::not_an_array(field, records))?;

    let mut batch = NormalizedBatch {
        reviews: Vec::with_capacity(items.len()),
        errors: Vec::new(),
    };
    for (index, raw) in items.iter().enumerate() {
        match normalize(raw, index) {
            Ok(review) => batch.reviews.push(review),
            Err(error) => {
                tracing::warn!(index, found = error.found, "skipping malformed record");
                batch.errors.push(error);
            }
        }
    }
    Ok(batch)
}

/// 文字列フィールド。数値・真偽値は文字列化し、null やオブジェクトは欠損扱い。
pub(crate) fn string_field(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

/// 空文字列も欠損として扱う文字列フィールド。
pub(crate) fn non_empty_string_field(record: &RawRecord, key: &str) -> Option<String> {
    string_field(record, key).filter(|value| !value.is_empty())
}

/// 整数フィールド。数値文字列も受け付ける。
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn int_field(record: &RawRecord, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|float| float.round() as i64)),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn bool_field(record: &RawRecord, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(value) => Some(*value),
        Value::String(value) => match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// ソースがIDを持たない場合の合成ID。
pub(crate) fn synthesized_id(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index}")
}
