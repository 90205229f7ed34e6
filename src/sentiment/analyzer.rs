//! 辞書ベースの感情スコアリング。
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::{error::InvalidInputError, util::round::round_to};

use super::lexicon::Lexicon;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.,/#!?$%^&*;:{}=_`"~()\n]"#).expect("valid punctuation pattern")
});

/// スコアの符号による分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => Self::Positive,
            -1 => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// 1テキストの分析結果。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: i32,
    /// `min(|score| / 10, 1)` を小数2桁に丸めた値。確率ではない。
    pub confidence: f64,
    /// トークンあたりのスコア（小数3桁）。
    pub comparative: f64,
    pub positive_terms: Vec<String>,
    pub negative_terms: Vec<String>,
}

impl SentimentResult {
    /// 空テキストに対する中立の結果。
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0,
            confidence: 0.0,
            comparative: 0.0,
            positive_terms: Vec::new(),
            negative_terms: Vec::new(),
        }
    }
}

/// 読み取り専用の辞書を保持するスコアラー。
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::builtin()))
    }
}

impl SentimentAnalyzer {
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// テキストをスコアリングする。
    ///
    /// 直前のトークンが否定語の場合、その語の極性を反転する。
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let lowered = text.to_lowercase();
        let cleaned = PUNCTUATION.replace_all(&lowered, " ");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }

        let mut score = 0;
        let mut positive_terms = Vec::new();
        let mut negative_terms = Vec::new();
        for (position, token) in tokens.iter().enumerate() {
            let Some(mut polarity) = self.lexicon.polarity(token) else {
                continue;
            };
            if position > 0 && self.lexicon.is_negator(tokens[position - 1]) {
                polarity = -polarity;
            }
            if polarity > 0 {
                positive_terms.push((*token).to_string());
            } else if polarity < 0 {
                negative_terms.push((*token).to_string());
            }
            score += polarity;
        }

        let comparative = round_to(f64::from(score) / tokens.len() as f64, 3);
        let confidence = round_to((f64::from(score.abs()) / 10.0).min(1.0), 2);

        SentimentResult {
            label: SentimentLabel::from_score(score),
            score,
            confidence,
            comparative,
            positive_terms,
            negative_terms,
        }
    }

    #[must_use]
    pub fn analyze_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentResult> {
        texts.iter().map(|text| self.analyze(text.as_ref())).collect()
    }

    /// JSON 配列の各要素をスコアリングする。文字列以外の要素は空テキスト扱い。
    ///
    /// # Errors
    /// `texts` が配列でない場合は [`InvalidInputError`] を返す。
    pub fn analyze_batch(&self, texts: &Value) -> Result<Vec<SentimentResult>, InvalidInputError> {
        let items = texts
            .as_array()
            .ok_or_else(|| InvalidInputError::not_an_array("texts", texts))?;
        Ok(items
            .iter()
            .map(|item| self.analyze(item.as_str().unwrap_or("")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::default()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn blank_text_is_neutral_zero(#[case] text: &str) {
        assert_eq!(analyzer().analyze(text), SentimentResult::neutral());
    }

    #[test]
    fn punctuation_only_text_is_neutral_zero() {
        assert_eq!(analyzer().analyze("?!..."), SentimentResult::neutral());
    }

    #[test]
    fn scores_indonesian_review() {
        let result = analyzer().analyze("Aplikasi ini bagus sekali");

        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 3);
        assert!((result.comparative - 0.75).abs() < 1e-9);
        assert!((result.confidence - 0.3).abs() < 1e-9);
        assert_eq!(result.positive_terms, vec!["bagus".to_string()]);
        assert!(result.negative_terms.is_empty());
    }

    #[test]
    fn negator_inverts_following_term() {
        let result = analyzer().analyze("This is not good.");
        assert_eq!(result.score, -3);
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.negative_terms, vec!["good".to_string()]);

        let result = analyzer().analyze("tidak buruk");
        assert_eq!(result.score, 3);
        assert_eq!(result.positive_terms, vec!["buruk".to_string()]);
    }

    #[test]
    fn custom_extreme_terms_are_negated_without_overflow() {
        let lexicon = Lexicon::builtin().with_terms([("parah", i32::MIN), ("hebat", i32::MAX)]);
        let analyzer = SentimentAnalyzer::new(Arc::new(lexicon));

        let result = analyzer.analyze("tidak parah");
        assert_eq!(result.score, 5);
        assert_eq!(result.label, SentimentLabel::Positive);

        let result = analyzer.analyze("hebat hebat hebat parah");
        assert_eq!(result.score, 10);
    }

    #[test]
    fn confidence_saturates_at_one() {
        let result = analyzer().analyze("amazing awesome fantastic wonderful");
        assert_eq!(result.score, 16);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn comparative_is_rounded_to_three_decimals() {
        let result = analyzer().analyze("bad app overall");
        assert!((result.comparative - (-1.0)).abs() < 1e-9);

        let result = analyzer().analyze("good but slow app");
        assert_eq!(result.score, 1);
        assert!((result.comparative - 0.25).abs() < 1e-9);

        let result = analyzer().analyze("nice one here");
        assert!((result.comparative - 1.0).abs() < 1e-9);

        let result = analyzer().analyze("fine a b");
        assert!((result.comparative - 0.667).abs() < 1e-9);
    }

    #[test]
    fn analyze_batch_scores_non_strings_as_empty() {
        let results = analyzer()
            .analyze_batch(&json!(["bagus", 42, null, "jelek"]))
            .unwrap();

        let labels: Vec<_> = results.iter().map(|result| result.label).collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Neutral,
                SentimentLabel::Neutral,
                SentimentLabel::Negative,
            ]
        );
    }

    #[test]
    fn analyze_batch_rejects_non_array() {
        let error = analyzer().analyze_batch(&json!("bagus")).unwrap_err();
        assert_eq!(error.field, "texts");
        assert_eq!(error.found, "string");
    }

    #[test]
    fn result_serializes_with_camel_case_terms() {
        let value = serde_json::to_value(analyzer().analyze("mantap")).unwrap();
        assert_eq!(value["label"], "Positive");
        assert_eq!(value["positiveTerms"], json!(["mantap"]));
        assert_eq!(value["negativeTerms"], json!([]));
    }
}
