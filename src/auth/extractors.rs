use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::session::{SessionKeys, SESSION_COOKIE};
use crate::response::ApiError;

/// Extracts the authenticated username from the session cookie.
#[derive(Debug)]
pub struct SessionUser(pub String);

/// Pull the session token out of a `Cookie` header value.
fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')))
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);

        let token = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_cookie_header)
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired session cookie");
                return Err(ApiError::unauthorized("User not authenticated"));
            }
        };

        Ok(SessionUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};
    use crate::state::AppState;

    #[tokio::test]
    async fn request_without_cookie_is_rejected_as_unauthenticated() {
        let (mut parts, _) = Request::builder()
            .uri("/profile")
            .body(())
            .unwrap()
            .into_parts();

        let err = SessionUser::from_request_parts(&mut parts, &AppState::fake())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "User not authenticated");
    }

    #[tokio::test]
    async fn request_with_invalid_token_is_rejected_as_unauthenticated() {
        let (mut parts, _) = Request::builder()
            .uri("/profile")
            .header(header::COOKIE, "session=garbage")
            .body(())
            .unwrap()
            .into_parts();

        let err = SessionUser::from_request_parts(&mut parts, &AppState::fake())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "User not authenticated");
    }

    #[tokio::test]
    async fn request_with_valid_token_yields_the_username() {
        let state = AppState::fake();
        let token = SessionKeys::from_ref(&state).sign("alice").expect("sign session");
        let (mut parts, _) = Request::builder()
            .uri("/profile")
            .header(header::COOKIE, format!("session={token}"))
            .body(())
            .unwrap()
            .into_parts();

        let SessionUser(username) = SessionUser::from_request_parts(&mut parts, &state)
            .await
            .expect("valid session should extract");
        assert_eq!(username, "alice");
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let header = "theme=dark; session=abc.def.ghi; lang=en";
        assert_eq!(token_from_cookie_header(header), Some("abc.def.ghi"));
    }

    #[test]
    fn finds_lone_session_cookie() {
        assert_eq!(token_from_cookie_header("session=tok"), Some("tok"));
    }

    #[test]
    fn ignores_cookies_with_session_prefix() {
        assert_eq!(token_from_cookie_header("session_id=nope"), None);
    }

    #[test]
    fn missing_session_cookie_is_none() {
        assert_eq!(token_from_cookie_header("theme=dark; lang=en"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}
