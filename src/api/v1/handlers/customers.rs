/*
 * Responsibility
 * - /customers handlers
 * - require_scope() first, then DTO validation, then the store
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
            customers::{CustomerRequest, CustomerResponse, CustomersPage},
            list::ListParams,
        },
        extractors::AuthCtx,
    },
    error::AppError,
    repos::ListOptions,
    state::AppState,
};

pub async fn list_customers(
    State(state): State<AppState>,
    auth: AuthCtx,
    Query(params): Query<ListParams>,
) -> Result<Json<CustomersPage>, AppError> {
    auth.require_scope()?;

    let opts = ListOptions::from(params);
    tracing::debug!(query = %opts.query, limit = opts.limit, offset = opts.offset, "list customers");

    let rows = state.stores.customers.list(&opts).await?;
    Ok(Json(CustomersPage {
        customers: rows.into_iter().map(CustomerResponse::from).collect(),
    }))
}

pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthCtx,
    Json(req): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state.stores.customers.create(req.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_customer(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, AppError> {
    auth.require_scope()?;

    let row = state.stores.customers.get(customer_id).await?;
    Ok(Json(row.into()))
}

pub async fn update_customer(
    State(state): State<AppState>,
    auth: AuthCtx,
    Path(customer_id): Path<Uuid>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    auth.require_scope()?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state
        .stores
        .customers
        .update(customer_id, req.into_fields())
        .await?;
    Ok(Json(row.into()))
}
