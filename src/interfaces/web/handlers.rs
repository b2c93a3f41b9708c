use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use super::render::render_page;
use super::view::PageModel;
use crate::application::DirectoryService;
use crate::domain::User;
use crate::interfaces::http::common::status_for;
use crate::interfaces::http::modules::users::ListUsersQuery;

#[derive(Clone)]
pub struct WebState {
    pub directory: Arc<DirectoryService<User>>,
}

/// `GET /` - the user table with page navigation.
pub async fn directory_page(
    State(state): State<WebState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, Html<String>) {
    let query = ListUsersQuery::from_pairs(pairs);
    let outcome = state
        .directory
        .list(query.page.as_deref(), query.limit.as_deref())
        .await
        .map_err(|e| {
            if e.is_store_failure() {
                tracing::warn!(error = %e, "User store failed, rendering notice");
            } else {
                tracing::error!(error = %e, "Directory listing failed, rendering notice");
            }
            status_for(&e).as_u16()
        });

    let model = PageModel::from_outcome(outcome, "/");
    let status = StatusCode::from_u16(model.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Html(render_page(&model)))
}
