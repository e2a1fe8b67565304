//! Access-token check → `RequestAuthState` in the request extensions.
//!
//! Runs once per request before the handler:
//! extract credential → `TokenValidator` → bind identity + the operation's
//! required scopes. Handlers read the result through `AuthCtx`.
//!
//! The requirement is attached per route (see `api::v1::routes`), so each
//! `MethodRouter` gets its own layer carrying its own static scope list.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{
    AuthenticatedIdentity, OperationScopeRequirement, RequestAuthState, extract::extract_credential,
};
use crate::state::AppState;

/// Guards `route` with token validation, binding `required` for the handler's scope check.
///
/// ```ignore
/// .route("/projects", guard(state, scopes::PROJECT_READ, get(list_projects)))
/// ```
pub fn guard(
    state: &AppState,
    required: OperationScopeRequirement,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    // axum 0.8 from_fn can't take extra arguments; carry the requirement in the state tuple.
    // route_layer: unmatched verbs still answer 405 without a token check.
    route.route_layer(middleware::from_fn_with_state(
        (state.clone(), required),
        access_middleware,
    ))
}

async fn access_middleware(
    State((state, required)): State<(AppState, OperationScopeRequirement)>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match extract_credential(header, &state.auth_scheme) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = %err, "authorization header rejected");
            return Err(err.into());
        }
    };

    let payload = match state.auth.validate(token).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "access token validation failed");
            return Err(err.into());
        }
    };

    let identity = AuthenticatedIdentity::from_payload(&payload);
    tracing::info!(
        subject = %identity.subject,
        scopes = ?identity.scopes,
        required = ?required.scopes(),
        "authenticated"
    );

    // middleware → extractor
    req.extensions_mut()
        .insert(RequestAuthState::bind(identity, required));

    Ok(next.run(req).await)
}
