//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Flash, OptionalAuth};
use crate::models::CurrentUser;

/// Home page template: login form, signup link and pending messages.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub messages: Vec<String>,
    pub current_user: Option<CurrentUser>,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(
    OptionalAuth(current_user): OptionalAuth,
    flash: Flash,
) -> Result<impl IntoResponse> {
    let messages = flash.take_all().await?;
    Ok(HomeTemplate {
        messages,
        current_user,
    })
}
