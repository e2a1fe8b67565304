/*
 * Responsibility
 * - /users handlers: scope-guarded, no user directory behind them (501)
 */
use axum::extract::Path;
use uuid::Uuid;

use crate::{api::v1::extractors::AuthCtx, error::AppError};

pub async fn list_users(auth: AuthCtx) -> Result<(), AppError> {
    auth.require_scope()?;
    Err(AppError::NotImplemented)
}

pub async fn get_user(auth: AuthCtx, Path(_user_id): Path<Uuid>) -> Result<(), AppError> {
    auth.require_scope()?;
    Err(AppError::NotImplemented)
}
