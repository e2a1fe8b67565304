//! Scopes each operation accepts. Any one granted scope is enough.

use crate::services::auth::OperationScopeRequirement;

pub const CUSTOMER_READ: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/customer.read", "tracker/customer.write"]);
pub const CUSTOMER_WRITE: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/customer.write"]);

pub const PROJECT_READ: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/project.read", "tracker/project.write"]);
pub const PROJECT_WRITE: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/project.write"]);

/// Issues and their comments.
pub const ISSUE_READ: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/issue.read", "tracker/issue.write"]);
pub const ISSUE_WRITE: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/issue.write"]);

pub const USER_READ: OperationScopeRequirement =
    OperationScopeRequirement::any_of(&["tracker/user.read"]);
