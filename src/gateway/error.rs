use std::error::Error as StdError;
use std::fmt;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Why a gateway call produced no usable reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Timeout,
    Connect,
    /// Request could not be built or sent, or the reply body was cut off.
    Request,
    /// Reply arrived but was not the expected JSON.
    Decode,
    /// Non-success HTTP status.
    Status,
}

impl GatewayErrorKind {
    fn of(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayErrorKind::Timeout
        } else if err.is_connect() {
            GatewayErrorKind::Connect
        } else if err.is_decode() {
            GatewayErrorKind::Decode
        } else if err.is_status() {
            GatewayErrorKind::Status
        } else {
            GatewayErrorKind::Request
        }
    }
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatewayErrorKind::Timeout => "timeout",
            GatewayErrorKind::Connect => "connect",
            GatewayErrorKind::Request => "request",
            GatewayErrorKind::Decode => "decode",
            GatewayErrorKind::Status => "status",
        };
        f.write_str(name)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" status={}", s)).unwrap_or_default()
}

/// A transport-level failure talking to the gateway. Anything that
/// keeps a well-formed reply from coming back lands here.
#[derive(Debug, thiserror::Error)]
#[error("gateway error kind={kind}{} url={url}: {message}", status_suffix(.status))]
pub struct GatewayError {
    kind: GatewayErrorKind,
    status: Option<u16>,
    url: String,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, url: &str, message: &str) -> Self {
        Self {
            kind,
            status: None,
            url: url.to_string(),
            message: message.to_string(),
            source: None,
        }
    }

    pub fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        Self {
            kind: GatewayErrorKind::of(&err),
            status: err.status().map(|s| s.as_u16()),
            url: url.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn status_error(status: u16, url: &str, body: &str) -> Self {
        Self {
            kind: GatewayErrorKind::Status,
            status: Some(status),
            url: url.to_string(),
            message: preview_body(body),
            source: None,
        }
    }

    pub(crate) fn decode_error(status: u16, url: &str, err: serde_json::Error, body: &str) -> Self {
        Self {
            kind: GatewayErrorKind::Decode,
            status: Some(status),
            url: url.to_string(),
            message: format!(
                "failed to decode response body: {} | body={}",
                err,
                preview_body(body)
            ),
            source: Some(Box::new(err)),
        }
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("  \n "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "x".repeat(BODY_PREVIEW_LIMIT + 20);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_status_error_display() {
        let err = GatewayError::status_error(502, "http://gw/set-decision", "bad gateway");
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=502"));
        assert!(msg.contains("url=http://gw/set-decision"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let decode_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = GatewayError::decode_error(200, "http://gw/x", decode_err, "nope");
        assert_eq!(err.kind(), GatewayErrorKind::Decode);
        assert_eq!(err.status(), Some(200));
        assert!(StdError::source(&err).is_some());
        assert!(err.to_string().contains("failed to decode response body"));
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = [
            GatewayErrorKind::Timeout,
            GatewayErrorKind::Connect,
            GatewayErrorKind::Request,
            GatewayErrorKind::Decode,
            GatewayErrorKind::Status,
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        assert_eq!(names, vec!["timeout", "connect", "request", "decode", "status"]);
    }

    #[test]
    fn test_new_has_no_status() {
        let err = GatewayError::new(GatewayErrorKind::Connect, "http://gw", "refused");
        assert_eq!(
            err.to_string(),
            "gateway error kind=connect url=http://gw: refused"
        );
    }
}
