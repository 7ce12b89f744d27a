//! Login gate for admin routes.
//!
//! Provides extractors for requiring a logged-in operator in route handlers
//! and helpers for recording login state in the session.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, session};

use crate::models::{CurrentOperator, session_keys};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in operator.
///
/// Page requests without a login are redirected to the login page. HTMX
/// requests get `401` with an `HX-Redirect` header so the whole page
/// navigates instead of swapping the login form into a fragment.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireLogin(operator): RequireLogin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", operator.username)
/// }
/// ```
pub struct RequireLogin(pub CurrentOperator);

/// Returned when a route needs a login and there is none.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginRejection {
    /// Redirect to the login page (page requests).
    RedirectToLogin,
    /// Ask HTMX to navigate to the login page.
    HtmxRedirect,
}

impl IntoResponse for LoginRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::HtmxRedirect => (
                StatusCode::UNAUTHORIZED,
                [("HX-Redirect", HeaderValue::from_static(LOGIN_PATH))],
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireLogin
where
    S: Send + Sync,
{
    type Rejection = LoginRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rejection = || {
            if is_htmx(&parts.headers) {
                LoginRejection::HtmxRedirect
            } else {
                LoginRejection::RedirectToLogin
            }
        };

        let session = parts.extensions.get::<Session>().ok_or_else(rejection)?;
        current_operator(session)
            .await
            .map(Self)
            .ok_or_else(rejection)
    }
}

/// Extractor that optionally gets the logged-in operator.
///
/// Unlike `RequireLogin`, this does not reject the request.
pub struct OptionalLogin(pub Option<CurrentOperator>);

impl<S> FromRequestParts<S> for OptionalLogin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = match parts.extensions.get::<Session>() {
            Some(session) => current_operator(session).await,
            None => None,
        };

        Ok(Self(operator))
    }
}

/// The operator of a session whose login flag is set.
async fn current_operator(session: &Session) -> Option<CurrentOperator> {
    let logged_in = session
        .get::<bool>(session_keys::LOGGED_IN)
        .await
        .ok()
        .flatten()
        .unwrap_or(false);
    if !logged_in {
        return None;
    }

    session
        .get::<CurrentOperator>(session_keys::CURRENT_OPERATOR)
        .await
        .ok()
        .flatten()
}

/// Whether a request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Record a successful login.
///
/// The session id is rotated and the session expires `hours` from now
/// regardless of activity.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_logged_in(
    session: &Session,
    operator: &CurrentOperator,
    hours: i64,
) -> Result<(), session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_OPERATOR, operator).await?;
    session.insert(session_keys::LOGGED_IN, true).await?;
    session.set_expiry(Some(Expiry::AtDateTime(
        OffsetDateTime::now_utc() + Duration::hours(hours),
    )));
    Ok(())
}

/// Drop all login state (logout).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_login(session: &Session) -> Result<(), session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_rejections() {
        let page = LoginRejection::RedirectToLogin.into_response();
        assert_eq!(page.status(), StatusCode::SEE_OTHER);
        assert_eq!(page.headers()["location"], "/login");

        let fragment = LoginRejection::HtmxRedirect.into_response();
        assert_eq!(fragment.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fragment.headers()["HX-Redirect"], "/login");
    }
}
