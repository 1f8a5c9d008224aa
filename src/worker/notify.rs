//! Push payload parsing.
//!
//! A push payload is a JSON object with optional `title` and `body` fields;
//! a missing payload (or one that is not valid JSON) substitutes the
//! configured defaults. Push handling never touches the cache.

use serde::Deserialize;

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Parse a push payload, falling back to the defaults field by field.
pub(crate) fn parse_push(
    payload: Option<&[u8]>,
    default_title: &str,
    default_body: &str,
) -> Notification {
    let parsed: PushPayload = payload
        .and_then(|bytes| serde_json::from_slice(bytes).ok())
        .unwrap_or_default();

    Notification {
        title: parsed.title.unwrap_or_else(|| default_title.to_string()),
        body: parsed.body.unwrap_or_else(|| default_body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload() {
        let n = parse_push(
            Some(br#"{"title":"New chapter","body":"Rust, part 3"}"#),
            "mdshelf",
            "default body",
        );
        assert_eq!(n.title, "New chapter");
        assert_eq!(n.body, "Rust, part 3");
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        let n = parse_push(None, "mdshelf", "default body");
        assert_eq!(n.title, "mdshelf");
        assert_eq!(n.body, "default body");
    }

    #[test]
    fn test_partial_payload_fills_per_field() {
        let n = parse_push(Some(br#"{"title":"Only title"}"#), "mdshelf", "default body");
        assert_eq!(n.title, "Only title");
        assert_eq!(n.body, "default body");
    }

    #[test]
    fn test_invalid_json_treated_as_absent() {
        let n = parse_push(Some(b"not json"), "mdshelf", "default body");
        assert_eq!(n.title, "mdshelf");
    }
}
