//! バッチ単位の集計。
//!
//! 感情ラベルの件数と割合、レビュー評価の平均と分布を求める。
use std::collections::BTreeMap;

use serde::Serialize;

use crate::{review::Review, util::round::round_to};

use super::analyzer::{SentimentAnalyzer, SentimentLabel, SentimentResult};

/// ラベル別の割合（小数2桁の文字列、例: `"33.33"`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub positive: String,
    pub negative: String,
    pub neutral: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub distribution: Distribution,
    pub avg_score: f64,
    pub avg_confidence: f64,
}

/// 感情分析結果を付与したレビュー。元のフィールドはそのまま残る。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: SentimentResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub avg_rating: f64,
    /// `"1"`〜`"5"` の件数。範囲外の評価は含まない。
    pub rating_distribution: BTreeMap<String, usize>,
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", count as f64 / total as f64 * 100.0)
}

/// 結果列の件数・割合・平均を求める。空なら全て 0。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn batch_stats<'a, I>(results: I) -> BatchStats
where
    I: IntoIterator<Item = &'a SentimentResult>,
{
    let mut total = 0_usize;
    let (mut positive, mut negative, mut neutral) = (0_usize, 0_usize, 0_usize);
    let mut score_sum = 0_i64;
    let mut confidence_sum = 0.0_f64;

    for result in results {
        total += 1;
        match result.label {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => neutral += 1,
        }
        score_sum += i64::from(result.score);
        confidence_sum += result.confidence;
    }

    let (avg_score, avg_confidence) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round_to(score_sum as f64 / total as f64, 2),
            round_to(confidence_sum / total as f64, 2),
        )
    };

    BatchStats {
        total,
        positive,
        negative,
        neutral,
        distribution: Distribution {
            positive: percentage(positive, total),
            negative: percentage(negative, total),
            neutral: percentage(neutral, total),
        },
        avg_score,
        avg_confidence,
    }
}

/// 指定フィールドのテキストを分析し、結果を `sentiment` として付与する。
#[must_use]
pub fn analyze_reviews(
    analyzer: &SentimentAnalyzer,
    reviews: &[Review],
    text_field: &str,
) -> Vec<AnalyzedReview> {
    reviews
        .iter()
        .map(|review| AnalyzedReview {
            sentiment: analyzer.analyze(review.text_field(text_field)),
            review: review.clone(),
        })
        .collect()
}

/// 評価の平均（小数2桁）と 1〜5 の分布。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rating_stats(reviews: &[Review]) -> RatingStats {
    let mut rating_distribution: BTreeMap<String, usize> =
        (1..=5).map(|star| (star.to_string(), 0)).collect();

    if reviews.is_empty() {
        return RatingStats {
            avg_rating: 0.0,
            rating_distribution,
        };
    }

    // 評価値は加工せず受け取るため、i64 の端の値が並んでも溢れない幅で合計する。
    let mut sum = 0_i128;
    for review in reviews {
        sum += i128::from(review.rating);
        if let Some(bucket) = rating_distribution.get_mut(&review.rating.to_string()) {
            *bucket += 1;
        }
    }

    RatingStats {
        avg_rating: round_to(sum as f64 / reviews.len() as f64, 2),
        rating_distribution,
    }
}
