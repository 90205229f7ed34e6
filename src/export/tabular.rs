//! ソース別の固定列レイアウトで CSV テキストを生成する。
//!
//! 行は入力順、各行は `\n` で終わる。数値列は引用符なしの整数で出力する。
use std::borrow::Cow;

use crate::{
    review::{AppInfo, Review},
    source::SourceKind,
};

/// CSV の1列。見出しと、レビューからセル値を取り出す方法を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AppName,
    AppId,
    UserName,
    Date,
    Rating,
    ReviewTitle,
    ReviewText,
    Version,
    ThumbsUp,
    ReplyDate,
    ReplyText,
    Query,
    TweetId,
    Author,
    Username,
    Verified,
    CreatedAt,
    Text,
    Likes,
    Retweets,
    Replies,
    Url,
}

pub const APP_STORE_COLUMNS: &[Column] = &[
    Column::AppName,
    Column::AppId,
    Column::UserName,
    Column::Date,
    Column::Rating,
    Column::ReviewTitle,
    Column::ReviewText,
    Column::Version,
];

pub const PLAY_STORE_COLUMNS: &[Column] = &[
    Column::AppName,
    Column::AppId,
    Column::UserName,
    Column::Date,
    Column::Rating,
    Column::ReviewText,
    Column::ThumbsUp,
    Column::Version,
    Column::ReplyDate,
    Column::ReplyText,
];

pub const TWITTER_COLUMNS: &[Column] = &[
    Column::Query,
    Column::TweetId,
    Column::Author,
    Column::Username,
    Column::Verified,
    Column::CreatedAt,
    Column::Text,
    Column::Likes,
    Column::Retweets,
    Column::Replies,
    Column::Url,
];

/// ソースに対応する列レイアウト。
#[must_use]
pub fn columns_for(source: SourceKind) -> &'static [Column] {
    match source {
        SourceKind::PlayStore => PLAY_STORE_COLUMNS,
        SourceKind::AppStore => APP_STORE_COLUMNS,
        SourceKind::Twitter => TWITTER_COLUMNS,
    }
}

impl Column {
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::AppName => "App Name",
            Self::AppId => "App ID",
            Self::UserName => "User Name",
            Self::Date => "Date",
            Self::Rating => "Rating",
            Self::ReviewTitle => "Review Title",
            Self::ReviewText => "Review Text",
            Self::Version => "Version",
            Self::ThumbsUp => "Thumbs Up",
            Self::ReplyDate => "Reply Date",
            Self::ReplyText => "Reply Text",
            Self::Query => "Query",
            Self::TweetId => "Tweet ID",
            Self::Author => "Author",
            Self::Username => "Username",
            Self::Verified => "Verified",
            Self::CreatedAt => "Created At",
            Self::Text => "Text",
            Self::Likes => "Likes",
            Self::Retweets => "Retweets",
            Self::Replies => "Replies",
            Self::Url => "URL",
        }
    }

    /// エスケープ済みのセル値。
    #[must_use]
    pub fn cell<'a>(self, review: &'a Review, app: &'a AppInfo) -> Cow<'a, str> {
        fn text(value: Option<&String>) -> Cow<'_, str> {
            value.map_or(Cow::Borrowed(""), |value| escape_field(value))
        }
        fn count(value: Option<i64>) -> Cow<'static, str> {
            Cow::Owned(value.unwrap_or(0).to_string())
        }

        let extras = &review.extras;
        match self {
            Self::AppName | Self::Query => escape_field(&app.name),
            Self::AppId => escape_field(&app.id),
            Self::UserName | Self::Username => escape_field(&review.user_name),
            Self::Date | Self::CreatedAt => escape_field(&review.date),
            Self::Rating => Cow::Owned(review.rating.to_string()),
            Self::ReviewTitle => text(extras.title.as_ref()),
            Self::ReviewText | Self::Text => escape_field(&review.review_text),
            Self::Version => text(extras.version.as_ref()),
            Self::ThumbsUp => count(extras.thumbs_up),
            Self::ReplyDate => text(extras.reply_date.as_ref()),
            Self::ReplyText => text(extras.reply_text.as_ref()),
            Self::TweetId => escape_field(&review.id),
            Self::Author => text(extras.author.as_ref()),
            Self::Verified => Cow::Borrowed(if extras.verified.unwrap_or(false) {
                "Yes"
            } else {
                "No"
            }),
            Self::Likes => count(extras.likes),
            Self::Retweets => count(extras.retweets),
            Self::Replies => count(extras.replies),
            Self::Url => text(extras.url.as_ref()),
        }
    }
}

/// `,` `\n` `"` のいずれかを含む場合のみ、二重引用符で囲み内部の `"` を `""` にする。
#[must_use]
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&[',', '\n', '"'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// 見出し行と各レビューの行からなる CSV テキストを生成する。
#[must_use]
pub fn to_csv(reviews: &[Review], app: &AppInfo, columns: &[Column]) -> String {
    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|column| Cow::Borrowed(column.header())));
    for review in reviews {
        push_row(&mut out, columns.iter().map(|column| column.cell(review, app)));
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = Cow<'a, str>>) {
    for (position, cell) in cells.enumerate() {
        if position > 0 {
            out.push(',');
        }
        out.push_str(&cell);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewExtras;
    use rstest::rstest;

    fn play_review(id: &str, rating: i64, text: &str) -> Review {
        Review {
            id: id.to_string(),
            user_name: format!("user-{id}"),
            date: "2024-05-01".to_string(),
            rating,
            review_text: text.to_string(),
            extras: ReviewExtras {
                thumbs_up: Some(0),
                version: Some(String::new()),
                reply_date: Some(String::new()),
                reply_text: Some(String::new()),
                ..ReviewExtras::default()
            },
        }
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a,b", "\"a,b\"")]
    #[case("line\nbreak", "\"line\nbreak\"")]
    #[case("say \"hi\"", "\"say \"\"hi\"\"\"")]
    #[case("", "")]
    #[case("carriage\rreturn", "carriage\rreturn")]
    fn escapes_only_when_needed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_field(input), expected);
    }

    #[test]
    fn escaped_field_parses_back_to_original() {
        let original = "a,\"b\"\nc";
        let escaped = escape_field(original);
        assert_eq!(escaped, "\"a,\"\"b\"\"\nc\"");

        let line = format!("{escaped}\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        let record = reader.records().next().expect("one row").expect("parses");
        assert_eq!(&record[0], original);
    }

    #[test]
    fn play_store_rows_follow_input_order_with_bare_ratings() {
        let app = AppInfo::new("Contoh, App", "com.contoh");
        let reviews: Vec<_> = [5, 5, 4, 1, 3]
            .into_iter()
            .enumerate()
            .map(|(index, rating)| play_review(&format!("r{index}"), rating, "ok"))
            .collect();

        let content = to_csv(&reviews, &app, columns_for(SourceKind::PlayStore));

        assert!(content.ends_with('\n'));
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "App Name,App ID,User Name,Date,Rating,Review Text,Thumbs Up,Version,Reply Date,Reply Text"
        );
        assert_eq!(lines[1], "\"Contoh, App\",com.contoh,user-r0,2024-05-01,5,ok,0,,,");

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let ratings: Vec<String> = reader
            .records()
            .map(|record| record.expect("row parses")[4].to_string())
            .collect();
        assert_eq!(ratings, vec!["5", "5", "4", "1", "3"]);
    }

    #[test]
    fn app_store_layout_includes_title() {
        let review = Review {
            id: "1".into(),
            user_name: "Sari".into(),
            date: "2024-01-02".into(),
            rating: 2,
            review_text: "Sering crash".into(),
            extras: ReviewExtras {
                title: Some("Kecewa".into()),
                version: Some("1.2.3".into()),
                ..ReviewExtras::default()
            },
        };

        let content = to_csv(
            &[review],
            &AppInfo::new("Bank", "123"),
            columns_for(SourceKind::AppStore),
        );

        assert_eq!(
            content,
            "App Name,App ID,User Name,Date,Rating,Review Title,Review Text,Version\n\
             Bank,123,Sari,2024-01-02,2,Kecewa,Sering crash,1.2.3\n"
        );
    }

    #[test]
    fn twitter_layout_uses_query_and_yes_no_flag() {
        let review = Review {
            id: "99".into(),
            user_name: "budi".into(),
            date: "2024-03-04T05:06:07.000Z".into(),
            rating: 0,
            review_text: "Layanan \"mantap\"".into(),
            extras: ReviewExtras {
                author: Some("budi".into()),
                verified: Some(true),
                likes: Some(10),
                retweets: Some(2),
                replies: Some(1),
                url: Some("https://x.com/budi/status/99".into()),
                ..ReviewExtras::default()
            },
        };

        let content = to_csv(
            &[review],
            &AppInfo::new("gojek", ""),
            columns_for(SourceKind::Twitter),
        );
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(
            lines[0],
            "Query,Tweet ID,Author,Username,Verified,Created At,Text,Likes,Retweets,Replies,URL"
        );
        assert_eq!(
            lines[1],
            "gojek,99,budi,budi,Yes,2024-03-04T05:06:07.000Z,\"Layanan \"\"mantap\"\"\",10,2,1,https://x.com/budi/status/99"
        );
    }

    #[test]
    fn empty_batch_is_header_only() {
        let content = to_csv(&[], &AppInfo::default(), APP_STORE_COLUMNS);
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }
}
