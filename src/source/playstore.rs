//! Google Play のレビューレコードのアダプタ。
use crate::review::{Review, ReviewExtras};

use super::{RawRecord, int_field, non_empty_string_field, string_field, synthesized_id};

pub(crate) fn normalize(record: &RawRecord, index: usize) -> Review {
    Review {
        id: non_empty_string_field(record, "id")
            .unwrap_or_else(|| synthesized_id("review", index)),
        user_name: string_field(record, "userName").unwrap_or_default(),
        date: string_field(record, "date").unwrap_or_default(),
        rating: int_field(record, "score").unwrap_or(0),
        review_text: string_field(record, "text").unwrap_or_default(),
        extras: ReviewExtras {
            user_image: non_empty_string_field(record, "userImage"),
            reply_date: Some(string_field(record, "replyDate").unwrap_or_default()),
            reply_text: Some(string_field(record, "replyText").unwrap_or_default()),
            thumbs_up: Some(int_field(record, "thumbsUp").unwrap_or(0)),
            version: Some(string_field(record, "version").unwrap_or_default()),
            ..ReviewExtras::default()
        },
    }
}
