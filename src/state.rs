/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - auth: token validator (read-only after startup)
 *   - stores: customers / projects / issues / comments
 * - Cheap to Clone (everything behind Arc)
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::repos::Stores;
use crate::services::auth::TokenValidator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenValidator>,
    /// Authorization scheme expected in front of the token.
    pub auth_scheme: Arc<str>,
    pub stores: Stores,
    pub tenant_customer_id: Uuid,
}

impl AppState {
    pub fn new(
        auth: Arc<TokenValidator>,
        auth_scheme: impl Into<Arc<str>>,
        stores: Stores,
        tenant_customer_id: Uuid,
    ) -> Self {
        Self {
            auth,
            auth_scheme: auth_scheme.into(),
            stores,
            tenant_customer_id,
        }
    }
}
