//! Authentication route handlers for admin.
//!
//! Credentials are checked by the auth service; the panel itself only
//! records the outcome in the session.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::render;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalLogin, clear_login, set_logged_in};
use crate::models::CurrentOperator;
use crate::state::AppState;

/// Shown when a login fails without a backend message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    operator: Option<String>,
    current_path: &'static str,
    username: String,
    error: Option<String>,
}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login page, or a welcome back message when logged in.
///
/// GET /login
async fn login_page(OptionalLogin(operator): OptionalLogin) -> impl IntoResponse {
    render(&LoginPageTemplate {
        operator: operator.map(|o| o.username),
        current_path: "/login",
        username: String::new(),
        error: None,
    })
}

/// Check credentials and start the session.
///
/// POST /login
#[instrument(skip_all, fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();

    if let Err(e) = state.auth().login(&username, &form.password).await {
        warn!(error = %e, "Login refused");
        let page = render(&LoginPageTemplate {
            operator: None,
            current_path: "/login",
            error: Some(e.server_message().unwrap_or(UNKNOWN_ERROR).to_string()),
            username,
        });
        return Ok(page.into_response());
    }

    state.drop_workspace(&session).await;
    let operator = CurrentOperator::new(username);
    set_logged_in(&session, &operator, state.config().session_hours).await?;
    info!("Operator logged in");

    Ok(Redirect::to("/catalog").into_response())
}

/// Logout and clear session.
///
/// POST /logout
async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    state.drop_workspace(&session).await;
    if let Err(e) = clear_login(&session).await {
        warn!(error = %e, "Failed to clear session on logout");
    }

    Redirect::to("/login")
}
