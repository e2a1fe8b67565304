/*
 * Responsibility
 * - v1 URL layout
 * - Every route except /health is wrapped by the access middleware together with
 *   the scopes its operation accepts (one requirement per verb)
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::{
    handlers::{
        comments::{create_comment, get_comment, list_comments, update_comment},
        customers::{create_customer, get_customer, list_customers, update_customer},
        health::health,
        issues::{create_issue, get_issue, list_issues, update_issue},
        projects::{create_project, get_project, list_projects, update_project},
        users::{get_user, list_users},
    },
    scopes,
};
use crate::middleware::auth::access::guard;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let s = state;

    Router::new()
        .route("/health", get(health))
        .route(
            "/customers",
            guard(s, scopes::CUSTOMER_READ, get(list_customers))
                .merge(guard(s, scopes::CUSTOMER_WRITE, post(create_customer))),
        )
        .route(
            "/customers/{customer_id}",
            guard(s, scopes::CUSTOMER_READ, get(get_customer))
                .merge(guard(s, scopes::CUSTOMER_WRITE, put(update_customer))),
        )
        .route(
            "/projects",
            guard(s, scopes::PROJECT_READ, get(list_projects))
                .merge(guard(s, scopes::PROJECT_WRITE, post(create_project))),
        )
        .route(
            "/projects/{project_id}",
            guard(s, scopes::PROJECT_READ, get(get_project))
                .merge(guard(s, scopes::PROJECT_WRITE, put(update_project))),
        )
        .route(
            "/projects/{project_id}/issues",
            guard(s, scopes::ISSUE_READ, get(list_issues))
                .merge(guard(s, scopes::ISSUE_WRITE, post(create_issue))),
        )
        .route(
            "/projects/{project_id}/issues/{issue_id}",
            guard(s, scopes::ISSUE_READ, get(get_issue))
                .merge(guard(s, scopes::ISSUE_WRITE, put(update_issue))),
        )
        .route(
            "/projects/{project_id}/issues/{issue_id}/comments",
            guard(s, scopes::ISSUE_READ, get(list_comments))
                .merge(guard(s, scopes::ISSUE_WRITE, post(create_comment))),
        )
        .route(
            "/projects/{project_id}/issues/{issue_id}/comments/{comment_id}",
            guard(s, scopes::ISSUE_READ, get(get_comment))
                .merge(guard(s, scopes::ISSUE_WRITE, put(update_comment))),
        )
        .route("/users", guard(s, scopes::USER_READ, get(list_users)))
        .route("/users/{user_id}", guard(s, scopes::USER_READ, get(get_user)))
}
