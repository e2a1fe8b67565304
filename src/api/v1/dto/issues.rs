/*
 * Responsibility
 * - Issues request/response DTOs
 * - reporter/state are server-owned, never read from the body
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::issue_repo::{IssueFields, IssueRow};

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub subject: String,
    pub severity: String,
    pub category: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub content: String,
}

impl IssueRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.subject.trim().is_empty() {
            return Err("subject is required");
        }
        if self.severity.trim().is_empty() {
            return Err("severity is required");
        }
        if self.category.trim().is_empty() {
            return Err("category is required");
        }
        Ok(())
    }

    pub fn into_fields(self) -> IssueFields {
        IssueFields {
            subject: self.subject,
            severity: self.severity,
            category: self.category,
            labels: self.labels,
            content: self.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reporter: String,
    pub subject: String,
    pub state: String,
    pub severity: String,
    pub category: String,
    pub labels: Vec<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IssueRow> for IssueResponse {
    fn from(row: IssueRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            reporter: row.reporter,
            subject: row.subject,
            state: row.state,
            severity: row.severity,
            category: row.category,
            labels: row.labels,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssuesPage {
    pub issues: Vec<IssueResponse>,
}
