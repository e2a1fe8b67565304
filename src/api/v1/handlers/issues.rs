/*
 * Responsibility
 * - /projects/{project_id}/issues handlers
 * - reporter = authenticated subject
 * - the parent project must exist under the tenant (404 otherwise)
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
            issues::{IssueRequest, IssueResponse, IssuesPage},
            list::ListParams,
        },
        extractors::AuthCtx,
    },
    error::AppError,
    repos::{ListOptions, issue_repo::IssueScope},
    state::AppState,
};

/// Resolves the project under the tenant and returns where its issues live.
pub(crate) async fn issue_scope(state: &AppState, project_id: Uuid) -> Result<IssueScope, AppError> {
    let project = state
        .stores
        .projects
        .get(state.tenant_customer_id, project_id)
        .await?;

    Ok(IssueScope {
        customer_id: project.customer_id,
        project_id: project.id,
    })
}

pub async fn list_issues(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<Json<IssuesPage>, AppError> {
    auth.require_scope()?;

    let scope = issue_scope(&state, project_id).await?;
    let rows = state
        .stores
        .issues
        .list(scope, &ListOptions::from(params))
        .await?;
    Ok(Json(IssuesPage {
        issues: rows.into_iter().map(IssueResponse::from).collect(),
    }))
}

pub async fn create_issue(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(project_id): Path<Uuid>,
    Json(req): Json<IssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>), AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let scope = issue_scope(&state, project_id).await?;
    let row = state
        .stores
        .issues
        .create(scope, auth.subject()?, req.into_fields())
        .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_issue(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<IssueResponse>, AppError> {
    auth.require_scope()?;

    let scope = issue_scope(&state, project_id).await?;
    let row = state.stores.issues.get(scope, issue_id).await?;
    Ok(Json(row.into()))
}

pub async fn update_issue(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<IssueRequest>,
) -> Result<Json<IssueResponse>, AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let scope = issue_scope(&state, project_id).await?;
    let row = state
        .stores
        .issues
        .update(scope, issue_id, req.into_fields())
        .await?;
    Ok(Json(row.into()))
}
