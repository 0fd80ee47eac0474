//! Authentication route handlers.
//!
//! Password login and registration against the `users` collection. Failed
//! attempts re-render the form with a message; server-side failures go
//! through [`AppError`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_session, set_current_user};
use crate::routes::notice::{Notice, NoticeQuery};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
    pub notice: Notice,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub username: Option<String>,
    pub notice: Notice,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    LoginTemplate {
        username: None,
        notice: query.notice(),
        email: String::new(),
    }
}

/// Handle login form submission.
///
/// Success stores the user in the session and redirects home. Any failure
/// shows the same "Invalid credentials" message.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.store());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.user_id, &user.username);
            tracing::info!(user_id = %user.user_id, "User logged in");
            Ok(Redirect::to("/?success=login").into_response())
        }
        Err(e) => render_login_error(e, form.email),
    }
}

fn render_login_error(err: AuthError, email: String) -> Result<Response> {
    let Some(message) = err.user_message() else {
        return Err(AppError::Auth(err));
    };
    tracing::info!(error = %err, "Login rejected");
    Ok(LoginTemplate {
        username: None,
        notice: Notice::error(message),
        email,
    }
    .into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    RegisterTemplate {
        username: None,
        notice: query.notice(),
        name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// On success the visitor is sent to the login page with a notice; they
/// are not logged in automatically.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.store());
    let registration = Registration {
        name: &form.name,
        email: &form.email,
        password: &form.password,
        confirm_password: &form.confirm_password,
    };

    match auth.register(&registration).await {
        Ok(user_id) => {
            tracing::info!(%user_id, "User registered");
            Ok(Redirect::to("/login?success=registered").into_response())
        }
        Err(err) => {
            let Some(message) = err.user_message() else {
                return Err(AppError::Auth(err));
            };
            tracing::info!(error = %err, "Registration rejected");
            Ok(RegisterTemplate {
                username: None,
                notice: Notice::error(message),
                name: form.name,
                email: form.email,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Drops the whole session, cart included.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/login?success=logged_out"))
}
