use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use catalog::auth::{AuthError, TokenVerifier};
use std::sync::Arc;

/// Extract the bearer token from an Authorization header value.
///
/// No header, or a `Bearer` scheme with no token, yields `Ok(None)`; any other
/// header that is not `Bearer <token>` is malformed.
fn extract_bearer_token(value: Option<&HeaderValue>) -> Result<Option<&str>, AuthError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::MalformedToken)?;
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Ok(None),
        (Some(scheme), None, None) if scheme.eq_ignore_ascii_case("Bearer") => Ok(None),
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => {
            Ok(Some(token))
        }
        _ => Err(AuthError::MalformedToken),
    }
}

/// Authentication middleware
///
/// Verifies the bearer token before any product handler runs and hands the
/// verified `Subject` to the handler through request extensions.
pub async fn auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers().get(header::AUTHORIZATION))?;
    let subject = verifier.verify(token)?;

    request.extensions_mut().insert(subject);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(Some(&header)).unwrap(), Some("abc.def.ghi"));

        let header = HeaderValue::from_static("bearer abc");
        assert_eq!(extract_bearer_token(Some(&header)).unwrap(), Some("abc"));

        assert_eq!(extract_bearer_token(None).unwrap(), None);
    }

    #[test]
    fn test_empty_bearer_is_missing() {
        for raw in ["Bearer", "Bearer ", "bearer   ", ""] {
            let header = HeaderValue::from_static(raw);
            assert_eq!(extract_bearer_token(Some(&header)).unwrap(), None, "{raw:?}");
        }
    }

    #[test]
    fn test_malformed_headers() {
        for raw in ["Basic dXNlcjpwYXNz", "Bearer a b", "token-only", "Basic"] {
            let header = HeaderValue::from_static(raw);
            assert!(
                matches!(extract_bearer_token(Some(&header)), Err(AuthError::MalformedToken)),
                "{raw:?} should be malformed"
            );
        }
    }
}
