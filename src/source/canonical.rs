//! 既に正規化済みの形（camelCase）で届いたレコードの読み込み。
//!
//! 感情分析 API のように呼び出し側がレビューを直接渡す経路で使う。
use serde_json::Value;

use crate::{
    error::InvalidInputError,
    review::{Review, ReviewExtras},
};

use super::{
    MalformedRecordError, NormalizedBatch, RawRecord, as_record, bool_field, collect_batch,
    int_field, non_empty_string_field, string_field, synthesized_id,
};

/// 正規化済みレコード1件を読み込む。
///
/// # Errors
/// レコードが JSON オブジェクトでない場合は [`MalformedRecordError`] を返す。
pub fn normalize(raw: &Value, index: usize) -> Result<Review, MalformedRecordError> {
    as_record(raw, index).map(|record| from_record(record, index))
}

/// 正規化済みレコードの配列を読み込む。
///
/// # Errors
/// `reviews` が配列でない場合は [`InvalidInputError`] を返す。
pub fn normalize_batch(reviews: &Value) -> Result<NormalizedBatch, InvalidInputError> {
    collect_batch("reviews", reviews, normalize)
}

fn from_record(record: &RawRecord, index: usize) -> Review {
    Review {
        id: non_empty_string_field(record, "id")
            .unwrap_or_else(|| synthesized_id("review", index)),
        user_name: string_field(record, "userName").unwrap_or_default(),
        date: string_field(record, "date").unwrap_or_default(),
        rating: int_field(record, "rating").unwrap_or(0),
        review_text: string_field(record, "reviewText").unwrap_or_default(),
        extras: ReviewExtras {
            title: string_field(record, "title"),
            version: string_field(record, "version"),
            thumbs_up: int_field(record, "thumbsUp"),
            reply_text: string_field(record, "replyText"),
            reply_date: string_field(record, "replyDate"),
            user_image: string_field(record, "userImage"),
            author: string_field(record, "author"),
            verified: bool_field(record, "verified"),
            likes: int_field(record, "likes"),
            retweets: int_field(record, "retweets"),
            replies: int_field(record, "replies"),
            url: string_field(record, "url"),
        },
    }
}
