//! レビュー本文の前処理ユーティリティ。
//!
//! 小文字化、記号除去、空白の圧縮、ロケール別ストップワード除去を固定の順序で適用します。
//! ASCII 外の文字（アクセント付き文字を含む）は記号除去で落ちます。既知の制約です。
pub mod stopwords;

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::util::round::round_to;

static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("valid special-char pattern"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static SENTENCE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"));

/// ストップワード辞書のロケール。`id` 以外はすべて英語扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Locale {
    #[default]
    Indonesian,
    English,
}

impl Locale {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("id") {
            Self::Indonesian
        } else {
            Self::English
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Indonesian => "id",
            Self::English => "en",
        }
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.code().to_string()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 前処理の各ステップの有効・無効。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PreprocessOptions {
    pub lowercase: bool,
    pub remove_special_chars: bool,
    pub remove_stopwords: bool,
    #[serde(alias = "lang")]
    pub locale: Locale,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_special_chars: true,
            remove_stopwords: true,
            locale: Locale::Indonesian,
        }
    }
}

impl PreprocessOptions {
    #[must_use]
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }
}

/// 元テキストに対する簡易統計。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub words: usize,
    pub chars: usize,
    pub sentences: usize,
    pub avg_word_length: f64,
}

/// テキストを前処理する。空入力には空文字列を返し、失敗しない。
///
/// 同じオプションで出力を再度処理しても結果は変わらない。
#[must_use]
pub fn preprocess(text: &str, options: &PreprocessOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut processed = if options.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    if options.remove_special_chars {
        processed = SPECIAL_CHARS.replace_all(&processed, "").into_owned();
        processed = WHITESPACE_RUNS.replace_all(&processed, " ").into_owned();
    }

    if options.remove_stopwords {
        processed = remove_stopwords(&processed, options.locale);
    }

    processed.trim().to_string()
}

/// 空白区切りのトークンのうち、小文字形がストップワードに一致するものを取り除く。
#[must_use]
pub fn remove_stopwords(text: &str, locale: Locale) -> String {
    let words = stopwords::for_locale(locale);
    text.split_whitespace()
        .filter(|token| !words.contains(token.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 小文字化して空白で分割する。空トークンは含まない。
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 元テキストの語数・文字数・文数・平均語長を求める。
///
/// 文字数と語長は Unicode スカラー値単位で数える。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_stats(text: &str) -> TextStats {
    let words = tokenize(text);
    let sentences = SENTENCE_BREAKS
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count();

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        let total: usize = words.iter().map(|word| word.chars().count()).sum();
        round_to(total as f64 / words.len() as f64, 2)
    };

    TextStats {
        words: words.len(),
        chars: text.chars().count(),
        sentences,
        avg_word_length,
    }
}
