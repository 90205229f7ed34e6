//! SNS（Twitter/X）投稿レコードのアダプタ。
//!
//! 投稿には評価がないため `rating` は常に 0。
use chrono::{DateTime, SecondsFormat};
use serde_json::Value;

use crate::review::{Review, ReviewExtras};

use super::{
    RawRecord, bool_field, int_field, non_empty_string_field, string_field, synthesized_id,
};

pub(crate) fn normalize(record: &RawRecord, index: usize) -> Review {
    let username = non_empty_string_field(record, "username");

    Review {
        id: non_empty_string_field(record, "id").unwrap_or_else(|| synthesized_id("tweet", index)),
        user_name: username.clone().unwrap_or_else(|| "unknown".to_string()),
        date: posted_at(record).unwrap_or_default(),
        rating: 0,
        review_text: string_field(record, "text").unwrap_or_default(),
        extras: ReviewExtras {
            author: Some(username.unwrap_or_else(|| "Unknown".to_string())),
            user_image: Some(first_photo(record).unwrap_or_default()),
            verified: Some(bool_field(record, "isVerified").unwrap_or(false)),
            likes: Some(int_field(record, "likes").unwrap_or(0)),
            retweets: Some(int_field(record, "retweets").unwrap_or(0)),
            replies: Some(int_field(record, "replies").unwrap_or(0)),
            url: Some(string_field(record, "permanentUrl").unwrap_or_default()),
            ..ReviewExtras::default()
        },
    }
}

/// `timeParsed` を優先し、無ければ UNIX 秒の `timestamp` を ISO-8601 に変換する。
fn posted_at(record: &RawRecord) -> Option<String> {
    non_empty_string_field(record, "timeParsed")
        .or_else(|| non_empty_string_field(record, "createdAt"))
        .or_else(|| {
            let seconds = int_field(record, "timestamp")?;
            DateTime::from_timestamp(seconds, 0)
                .map(|parsed| parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
        })
}

fn first_photo(record: &RawRecord) -> Option<String> {
    match record.get("photos")?.as_array()?.first()? {
        Value::String(url) => Some(url.clone()),
        Value::Object(photo) => string_field(photo, "url"),
        _ => None,
    }
}
