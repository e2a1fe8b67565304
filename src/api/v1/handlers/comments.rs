/*
 * Responsibility
 * - /projects/{project_id}/issues/{issue_id}/comments handlers
 * - author = authenticated subject
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            comments::{CommentRequest, CommentResponse, CommentsPage},
            list::ListParams,
        },
        extractors::AuthCtx,
        handlers::issues::issue_scope,
    },
    error::AppError,
    repos::{ListOptions, comment_repo::CommentScope},
    state::AppState,
};

async fn comment_scope(
    state: &AppState,
    project_id: Uuid,
    issue_id: Uuid,
) -> Result<CommentScope, AppError> {
    let scope = issue_scope(state, project_id).await?;
    let issue = state.stores.issues.get(scope, issue_id).await?;

    Ok(CommentScope {
        customer_id: issue.customer_id,
        project_id: issue.project_id,
        issue_id: issue.id,
    })
}

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<ListParams>,
) -> Result<Json<CommentsPage>, AppError> {
    auth.require_scope()?;

    let scope = comment_scope(&state, project_id, issue_id).await?;
    let rows = state
        .stores
        .comments
        .list(scope, &ListOptions::from(params))
        .await?;
    Ok(Json(CommentsPage {
        comments: rows.into_iter().map(CommentResponse::from).collect(),
    }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let scope = comment_scope(&state, project_id, issue_id).await?;
    let row = state
        .stores
        .comments
        .create(scope, auth.subject()?, req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_comment(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<CommentResponse>, AppError> {
    auth.require_scope()?;

    let scope = comment_scope(&state, project_id, issue_id).await?;
    let row = state.stores.comments.get(scope, comment_id).await?;
    Ok(Json(row.into()))
}

pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let scope = comment_scope(&state, project_id, issue_id).await?;
    let row = state
        .stores
        .comments
        .update(scope, comment_id, req.content)
        .await?;
    Ok(Json(row.into()))
}
