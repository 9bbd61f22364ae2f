//! Header masking and body capture rules applied before an entry is stored

use crate::http::{Headers, HttpRequest, RequestBody};

/// Replacement written for every value of a sensitive header
pub const REDACTION_MARKER: &str = "***";

/// Header names whose values are never recorded, compared case-insensitively
pub const SENSITIVE_HEADERS: [&str; 7] = [
    "authorization",
    "cookie",
    "proxy-authorization",
    "proxy-authenticate",
    "set-cookie",
    "token",
    "www-authenticate",
];

pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

/// Copy `headers`, replacing each value of a sensitive header with [`REDACTION_MARKER`]
///
/// Names keep their original case and the number of values is unchanged.
pub fn mask_sensitive_headers(headers: &Headers) -> Headers {
    headers
        .iter()
        .map(|(name, values)| {
            let values = if is_sensitive_header(name) {
                vec![REDACTION_MARKER.to_string(); values.len()]
            } else {
                values.clone()
            };
            (name.clone(), values)
        })
        .collect()
}

/// Textual form of a request payload
///
/// An explicit body wins, then the query pairs; bytes that are not UTF-8 give `None`.
pub fn stringify_request_body(request: &HttpRequest) -> Option<String> {
    match &request.body {
        Some(RequestBody::Text(text)) => Some(text.clone()),
        Some(RequestBody::Bytes(bytes)) => String::from_utf8(bytes.clone()).ok(),
        Some(RequestBody::Json(value)) => Some(value.to_string()),
        None if !request.query.is_empty() => Some(encode_query(&request.query)),
        None => None,
    }
}

pub fn stringify_response_body(body: &[u8]) -> Option<String> {
    std::str::from_utf8(body).ok().map(str::to_string)
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Cut `body` to at most `max_length` bytes; zero or negative keeps the whole body
///
/// The cut is hard and leaves no marker behind. A cut inside a multi-byte character
/// moves back to the previous character boundary.
pub fn truncate_body(mut body: String, max_length: i64) -> String {
    if max_length <= 0 {
        return body;
    }

    let max = usize::try_from(max_length).unwrap_or(usize::MAX);
    if body.len() <= max {
        return body;
    }

    let mut cut = max;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body.truncate(cut);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &[&str])]) -> Headers {
        pairs
            .iter()
            .map(|(name, values)| {
                (name.to_string(), values.iter().map(|v| v.to_string()).collect())
            })
            .collect()
    }

    #[test]
    fn test_authorization_is_masked() {
        let masked = mask_sensitive_headers(&headers(&[("Authorization", &["Bearer xyz"])]));

        assert_eq!(masked["Authorization"], vec!["***"]);
    }

    #[test]
    fn test_masking_keeps_value_count() {
        let masked = mask_sensitive_headers(&headers(&[("Set-Cookie", &["a=1", "b=2", "c=3"])]));

        assert_eq!(masked["Set-Cookie"], vec!["***", "***", "***"]);
    }

    #[test]
    fn test_masking_is_case_insensitive() {
        let masked = mask_sensitive_headers(&headers(&[
            ("COOKIE", &["session=1"]),
            ("token", &["abc"]),
            ("Proxy-Authorization", &["Basic x"]),
            ("WWW-Authenticate", &["Bearer"]),
            ("proxy-authenticate", &["Basic"]),
        ]));

        for values in masked.values() {
            assert!(values.iter().all(|v| v == REDACTION_MARKER));
        }
        assert!(masked.contains_key("COOKIE"));
    }

    #[test]
    fn test_other_headers_untouched() {
        let original = headers(&[("Content-Type", &["application/json"]), ("X-Token", &["t"])]);
        let masked = mask_sensitive_headers(&original);

        assert_eq!(masked, original);
    }

    #[test]
    fn test_stringify_text_body() {
        let request = HttpRequest::post("https://example.com").with_body("plain text");
        assert_eq!(stringify_request_body(&request), Some("plain text".to_string()));
    }

    #[test]
    fn test_stringify_json_body_is_compact() {
        let request =
            HttpRequest::post("https://example.com").with_json(json!({"ok": true, "n": 1}));
        let body = stringify_request_body(&request).unwrap();

        assert!(!body.contains(' '));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&body).unwrap(), json!({"ok": true, "n": 1}));
    }

    #[test]
    fn test_stringify_binary_body_is_absent() {
        let request = HttpRequest::post("https://example.com").with_bytes(vec![0xc3, 0x28]);
        assert_eq!(stringify_request_body(&request), None);
    }

    #[test]
    fn test_stringify_query_when_no_body() {
        let request = HttpRequest::get("https://example.com")
            .with_query("q", "rust lang")
            .with_query("page", "1");

        assert_eq!(stringify_request_body(&request), Some("q=rust%20lang&page=1".to_string()));
    }

    #[test]
    fn test_body_wins_over_query() {
        let request =
            HttpRequest::post("https://example.com").with_query("q", "x").with_body("payload");

        assert_eq!(stringify_request_body(&request), Some("payload".to_string()));
    }

    #[test]
    fn test_no_body() {
        assert_eq!(stringify_request_body(&HttpRequest::get("https://example.com")), None);
    }

    #[test]
    fn test_stringify_response_body() {
        assert_eq!(stringify_response_body(b"hello"), Some("hello".to_string()));
        assert_eq!(stringify_response_body(&[0xff, 0xff]), None);
    }

    #[test]
    fn test_truncate_to_exact_length() {
        let body = "a".repeat(100);
        assert_eq!(truncate_body(body, 10), "a".repeat(10));
    }

    #[test]
    fn test_truncate_disabled_for_zero_and_negative() {
        let body = "a".repeat(100);
        assert_eq!(truncate_body(body.clone(), 0), body);
        assert_eq!(truncate_body(body.clone(), -5), body);
    }

    #[test]
    fn test_short_body_unchanged() {
        assert_eq!(truncate_body("short".to_string(), 1024), "short");
        assert_eq!(truncate_body("exact".to_string(), 5), "exact");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // "é" is two bytes, a cut at byte 2 would split it
        let truncated = truncate_body("aé-tail".to_string(), 2);
        assert_eq!(truncated, "a");
    }
}
