use axum::http::{header, HeaderMap};

use backend_domain::Version;

use crate::error::HttpError;

/// The version a conditional request expects, taken from `If-Match`.
/// A missing or unparsable header cannot match any stored version.
pub fn expected_version(headers: &HeaderMap) -> Result<Version, HttpError> {
    let raw = headers
        .get(header::IF_MATCH)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| HttpError::PreconditionFailed("If-Match header is required".to_string()))?;
    Version::parse_etag(raw).ok_or_else(|| {
        HttpError::PreconditionFailed(format!("If-Match value {:?} is not a version", raw))
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_quoted_and_bare_versions() {
        let version = Version::fresh();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_MATCH,
            HeaderValue::from_str(&format!("\"{}\"", version)).expect("header"),
        );
        assert_eq!(expected_version(&headers).expect("quoted"), version);

        headers.insert(
            header::IF_MATCH,
            HeaderValue::from_str(&version.to_string()).expect("header"),
        );
        assert_eq!(expected_version(&headers).expect("bare"), version);
    }

    #[test]
    fn missing_or_garbage_is_precondition_failure() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            expected_version(&headers),
            Err(HttpError::PreconditionFailed(_))
        ));
        headers.insert(header::IF_MATCH, HeaderValue::from_static("*"));
        assert!(matches!(
            expected_version(&headers),
            Err(HttpError::PreconditionFailed(_))
        ));
    }
}
