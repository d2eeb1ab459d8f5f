/*
 * Responsibility
 * - POST /authorize
 * - Json を受けて TokenAuthorizer に渡し、decision を返す
 * - 失敗は AppError (401) に寄せる。どのチェックで落ちたかは返さない
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::authorize::AuthorizeRequest, error::AppError,
    services::authorizer::{AuthorizationDecision, IncomingRequest},
    state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizationDecision>, AppError> {
    let request = IncomingRequest::from(req);
    let decision = state.authorizer.authorize(&request)?;

    Ok(Json(decision))
}
