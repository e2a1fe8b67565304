/*
 * Responsibility
 * - issues CRUD under (customer, project)
 * - reporter is fixed at creation; new issues start in state "created"
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::{ListOptions, error::StoreError};

pub const INITIAL_STATE: &str = "created";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub customer_id: Uuid,
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFields {
    pub subject: String,
    pub severity: String,
    pub category: String,
    pub labels: Vec<String>,
    pub content: String,
}

/// Where an issue lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueScope {
    pub customer_id: Uuid,
    pub project_id: Uuid,
}

impl IssueScope {
    fn owns(&self, row: &IssueRow) -> bool {
        row.customer_id == self.customer_id && row.project_id == self.project_id
    }
}

#[async_trait]
pub trait IssueRepo: Send + Sync {
    async fn list(
        &self,
        scope: IssueScope,
        opts: &ListOptions,
    ) -> Result<Vec<IssueRow>, StoreError>;
    async fn create(
        &self,
        scope: IssueScope,
        reporter: &str,
        fields: IssueFields,
    ) -> Result<IssueRow, StoreError>;
    async fn get(&self, scope: IssueScope, id: Uuid) -> Result<IssueRow, StoreError>;
    async fn update(
        &self,
        scope: IssueScope,
        id: Uuid,
        fields: IssueFields,
    ) -> Result<IssueRow, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryIssueRepo {
    rows: RwLock<Vec<IssueRow>>,
}

#[async_trait]
impl IssueRepo for InMemoryIssueRepo {
    async fn list(
        &self,
        scope: IssueScope,
        opts: &ListOptions,
    ) -> Result<Vec<IssueRow>, StoreError> {
        let rows = self.rows.read().await;
        let owned = rows.iter().filter(|row| scope.owns(row));
        Ok(opts.page(owned, |row| row.subject.as_str()))
    }

    async fn create(
        &self,
        scope: IssueScope,
        reporter: &str,
        fields: IssueFields,
    ) -> Result<IssueRow, StoreError> {
        let now = Utc::now();
        let row = IssueRow {
            id: Uuid::new_v4(),
            project_id: scope.project_id,
            customer_id: scope.customer_id,
            reporter: reporter.to_string(),
            subject: fields.subject,
            state: INITIAL_STATE.to_string(),
            severity: fields.severity,
            category: fields.category,
            labels: fields.labels,
            content: fields.content,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn get(&self, scope: IssueScope, id: Uuid) -> Result<IssueRow, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id && scope.owns(row))
            .cloned()
            .ok_or(StoreError::not_found("issue"))
    }

    async fn update(
        &self,
        scope: IssueScope,
        id: Uuid,
        fields: IssueFields,
    ) -> Result<IssueRow, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id && scope.owns(row))
            .ok_or(StoreError::not_found("issue"))?;
        row.subject = fields.subject;
        row.severity = fields.severity;
        row.category = fields.category;
        row.labels = fields.labels;
        row.content = fields.content;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> IssueScope {
        IssueScope {
            customer_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
        }
    }

    fn fields(subject: &str) -> IssueFields {
        IssueFields {
            subject: subject.to_string(),
            severity: "high".to_string(),
            category: "bug".to_string(),
            labels: vec!["ui".to_string()],
            content: "steps to reproduce".to_string(),
        }
    }

    #[tokio::test]
    async fn created_issue_records_reporter_and_initial_state() {
        let repo = InMemoryIssueRepo::default();
        let scope = scope();

        let issue = repo.create(scope, "u1", fields("crash")).await.unwrap();

        assert_eq!(issue.reporter, "u1");
        assert_eq!(issue.state, INITIAL_STATE);
        assert_eq!(repo.get(scope, issue.id).await.unwrap(), issue);
    }

    #[tokio::test]
    async fn issue_is_invisible_from_another_project() {
        let repo = InMemoryIssueRepo::default();
        let scope = scope();
        let issue = repo.create(scope, "u1", fields("crash")).await.unwrap();

        let elsewhere = IssueScope {
            project_id: Uuid::new_v4(),
            ..scope
        };
        assert_eq!(
            repo.get(elsewhere, issue.id).await,
            Err(StoreError::not_found("issue"))
        );
    }

    #[tokio::test]
    async fn update_keeps_reporter_and_state() {
        let repo = InMemoryIssueRepo::default();
        let scope = scope();
        let issue = repo.create(scope, "u1", fields("crash")).await.unwrap();

        let updated = repo.update(scope, issue.id, fields("crash on save")).await.unwrap();

        assert_eq!(updated.subject, "crash on save");
        assert_eq!(updated.reporter, "u1");
        assert_eq!(updated.state, INITIAL_STATE);
    }

    #[tokio::test]
    async fn list_filters_by_subject() {
        let repo = InMemoryIssueRepo::default();
        let scope = scope();
        repo.create(scope, "u1", fields("Login fails")).await.unwrap();
        repo.create(scope, "u1", fields("Slow search")).await.unwrap();

        let opts = ListOptions {
            query: "login".to_string(),
            limit: 100,
            offset: 0,
        };
        let rows = repo.list(scope, &opts).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "Login fails");
    }
}
