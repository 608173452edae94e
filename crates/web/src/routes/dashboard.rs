//! Dashboard route handler (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Flash, RequireAuth};
use crate::models::CurrentUser;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: CurrentUser,
    pub messages: Vec<String>,
}

/// Display the dashboard for the logged-in user.
#[instrument(skip_all)]
pub async fn dashboard(RequireAuth(user): RequireAuth, flash: Flash) -> Result<impl IntoResponse> {
    let messages = flash.take_all().await?;
    Ok(DashboardTemplate { user, messages })
}
