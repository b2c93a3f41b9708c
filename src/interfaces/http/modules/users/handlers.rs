//! User directory API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::ListUsersQuery;
use crate::application::{DirectoryService, ResponsePayload};
use crate::domain::User;
use crate::interfaces::http::common::ErrorResponse;
use crate::shared::DirectoryError;

#[derive(Clone)]
pub struct UserHandlerState {
    pub directory: Arc<DirectoryService<User>>,
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = ResponsePayload),
        (status = 503, description = "User store unavailable", body = ErrorResponse),
        (status = 504, description = "User store timed out", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ResponsePayload>, DirectoryError> {
    let query = ListUsersQuery::from_pairs(pairs);
    let page = state
        .directory
        .list(query.page.as_deref(), query.limit.as_deref())
        .await?;

    Ok(Json(page.payload))
}
