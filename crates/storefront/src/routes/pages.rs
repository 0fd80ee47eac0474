//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalAuth;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub username: Option<String>,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub username: Option<String>,
}

/// Display the About page.
pub async fn about(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    AboutTemplate {
        username: user.map(|u| u.username),
    }
}

/// Display the Services page.
pub async fn services(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    ServicesTemplate {
        username: user.map(|u| u.username),
    }
}
