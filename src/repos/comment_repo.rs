/*
 * Responsibility
 * - comments CRUD under (customer, project, issue)
 * - author is fixed at creation, only content can change
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::{ListOptions, error::StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub project_id: Uuid,
    pub customer_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentScope {
    pub customer_id: Uuid,
    pub project_id: Uuid,
    pub issue_id: Uuid,
}

impl CommentScope {
    fn owns(&self, row: &CommentRow) -> bool {
        row.customer_id == self.customer_id
            && row.project_id == self.project_id
            && row.issue_id == self.issue_id
    }
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn list(
        &self,
        scope: CommentScope,
        opts: &ListOptions,
    ) -> Result<Vec<CommentRow>, StoreError>;
    async fn create(
        &self,
        scope: CommentScope,
        author: &str,
        content: String,
    ) -> Result<CommentRow, StoreError>;
    async fn get(&self, scope: CommentScope, id: Uuid) -> Result<CommentRow, StoreError>;
    async fn update(
        &self,
        scope: CommentScope,
        id: Uuid,
        content: String,
    ) -> Result<CommentRow, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCommentRepo {
    rows: RwLock<Vec<CommentRow>>,
}

#[async_trait]
impl CommentRepo for InMemoryCommentRepo {
    async fn list(
        &self,
        scope: CommentScope,
        opts: &ListOptions,
    ) -> Result<Vec<CommentRow>, StoreError> {
        let rows = self.rows.read().await;
        let owned = rows.iter().filter(|row| scope.owns(row));
        Ok(opts.page(owned, |row| row.content.as_str()))
    }

    async fn create(
        &self,
        scope: CommentScope,
        author: &str,
        content: String,
    ) -> Result<CommentRow, StoreError> {
        let now = Utc::now();
        let row = CommentRow {
            id: Uuid::new_v4(),
            issue_id: scope.issue_id,
            project_id: scope.project_id,
            customer_id: scope.customer_id,
            author: author.to_string(),
            content,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn get(&self, scope: CommentScope, id: Uuid) -> Result<CommentRow, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id && scope.owns(row))
            .cloned()
            .ok_or(StoreError::not_found("comment"))
    }

    async fn update(
        &self,
        scope: CommentScope,
        id: Uuid,
        content: String,
    ) -> Result<CommentRow, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id && scope.owns(row))
            .ok_or(StoreError::not_found("comment"))?;
        row.content = content;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
