use serde_json::Value;
use thiserror::Error;

/// A response body that does not have the shape its endpoint promises.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing or mistyped field `{0}`")]
    MissingField(String),
    #[error("cookie `{0}` was not set by the server")]
    MissingCookie(String),
    #[error("unrecognized script-call body: {0}")]
    Script(String),
}

pub fn parse_json(body: &[u8]) -> Result<Value, PayloadError> {
    Ok(serde_json::from_slice(body)?)
}

/// Reads `result.<key>` as a string. Numbers are accepted and rendered in
/// decimal, since the server sends `uin` as a JSON number.
pub fn result_string(value: &Value, key: &str) -> Result<String, PayloadError> {
    let field = value
        .get("result")
        .and_then(|result| result.get(key))
        .ok_or_else(|| PayloadError::MissingField(format!("result.{key}")))?;
    match field {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(PayloadError::MissingField(format!("result.{key}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_string_accepts_strings_and_numbers() {
        let body = json!({"retcode": 0, "result": {"uin": 12345, "psessionid": "8368046764001d"}});
        assert_eq!(result_string(&body, "uin").unwrap(), "12345");
        assert_eq!(result_string(&body, "psessionid").unwrap(), "8368046764001d");
    }

    #[test]
    fn result_string_rejects_missing_or_empty() {
        let body = json!({"result": {"vfwebqq": ""}});
        assert!(matches!(
            result_string(&body, "vfwebqq"),
            Err(PayloadError::MissingField(f)) if f == "result.vfwebqq"
        ));
        assert!(result_string(&json!({"retcode": 100}), "vfwebqq").is_err());
    }

    #[test]
    fn parse_json_reports_garbage() {
        assert!(matches!(parse_json(b"<html>"), Err(PayloadError::Json(_))));
    }
}
