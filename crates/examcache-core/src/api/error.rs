use reqwest::StatusCode;
use thiserror::Error;

/// Longest slice of a response body kept in an error.
const BODY_EXCERPT_BYTES: usize = 500;

/// Failures talking to the remote test store.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401/403: key rejected or a row-level policy denied the request.
    #[error("Rejected by remote store ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    /// 404, or 406 when a single-row read did not match exactly one row.
    #[error("Not found in remote store: {0}")]
    NotFound(String),

    /// 400/422: the store refused the payload or the filter.
    #[error("Remote store rejected the request: {0}")]
    Validation(String),

    /// 409: unique or foreign-key constraint.
    #[error("Conflicts with stored data: {0}")]
    Conflict(String),

    #[error("Remote store unavailable ({status}): {body}")]
    Unavailable { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    fn excerpt(body: &str) -> String {
        if body.len() <= BODY_EXCERPT_BYTES {
            return body.to_string();
        }
        let mut end = BODY_EXCERPT_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = Self::excerpt(body);
        match status.as_u16() {
            401 | 403 => ApiError::Rejected { status, body },
            404 | 406 => ApiError::NotFound(body),
            400 | 422 => ApiError::Validation(body),
            409 => ApiError::Conflict(body),
            429 | 500..=599 => ApiError::Unavailable { status, body },
            _ => ApiError::InvalidResponse(format!("status {}: {}", status, body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "rls"),
            ApiError::Rejected { status: StatusCode::FORBIDDEN, body } if body == "rls"
        ));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_ACCEPTABLE, "PGRST116"), ApiError::NotFound(b) if b == "PGRST116"));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_REQUEST, "bad uuid"), ApiError::Validation(_)));
        assert!(matches!(ApiError::from_status(StatusCode::CONFLICT, "dup"), ApiError::Conflict(b) if b == "dup"));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::Unavailable { .. }
        ));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, "down"), ApiError::Unavailable { .. }));
        assert!(matches!(ApiError::from_status(StatusCode::IM_A_TEAPOT, ""), ApiError::InvalidResponse(m) if m.contains("418")));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let long = "é".repeat(400);
        let excerpt = ApiError::excerpt(&long);
        assert!(excerpt.ends_with("... (800 bytes)"));
        assert_eq!(ApiError::excerpt("short"), "short");
    }
}
