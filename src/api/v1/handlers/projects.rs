/*
 * Responsibility
 * - /projects handlers, always under the tenant customer
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
            list::ListParams,
            projects::{ProjectRequest, ProjectResponse, ProjectsPage},
        },
        extractors::AuthCtx,
    },
    error::AppError,
    repos::ListOptions,
    state::AppState,
};

pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthCtx,
    Query(params): Query<ListParams>,
) -> Result<Json<ProjectsPage>, AppError> {
    auth.require_scope()?;

    let rows = state
        .stores
        .projects
        .list(state.tenant_customer_id, &ListOptions::from(params))
        .await?;
    Ok(Json(ProjectsPage {
        projects: rows.into_iter().map(ProjectResponse::from).collect(),
    }))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthCtx,
    Json(req): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state
        .stores
        .projects
        .create(state.tenant_customer_id, req.into_fields())
        .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    auth.require_scope()?;

    let row = state
        .stores
        .projects
        .get(state.tenant_customer_id, project_id)
        .await?;
    Ok(Json(row.into()))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(project_id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state
        .stores
        .projects
        .update(state.tenant_customer_id, project_id, req.into_fields())
        .await?;
    Ok(Json(row.into()))
}
