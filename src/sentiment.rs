//! 辞書ベースの感情分析と、その集計。
pub mod aggregate;
pub mod analyzer;
pub mod lexicon;

pub use aggregate::{
    AnalyzedReview, BatchStats, Distribution, RatingStats, analyze_reviews, batch_stats,
    rating_stats,
};
pub use analyzer::{SentimentAnalyzer, SentimentLabel, SentimentResult};
pub use lexicon::Lexicon;
