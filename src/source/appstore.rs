//! App Store のレビューレコードのアダプタ。
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
            title: Some(string_field(record, "title").unwrap_or_default()),
            version: Some(string_field(record, "version").unwrap_or_default()),
            // App Store has no helpfulness counter.
            thumbs_up: Some(0),
            ..ReviewExtras::default()
        },
    }
}
