/// リクエスト単位で処理全体を拒否する入力エラー。
use serde_json::Value;
use thiserror::Error;

/// バッチとして配列が必要な箇所に配列以外が渡された。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{field}` must be an array, found {found}")]
pub struct InvalidInputError {
    pub field: &'static str,
    pub found: &'static str,
}

impl InvalidInputError {
    #[must_use]
    pub fn not_an_array(field: &'static str, value: &Value) -> Self {
        Self {
            field,
            found: json_kind(value),
        }
    }
}

/// JSON 値の種類名。エラーメッセージ用。
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_names_field_and_found_kind() {
        let error = InvalidInputError::not_an_array("texts", &json!("hello"));
        assert_eq!(error.to_string(), "`texts` must be an array, found string");
    }
}
