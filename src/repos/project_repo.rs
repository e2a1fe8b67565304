/*
 * Responsibility
 * - projects CRUD, always scoped to one customer
 * - name is unique per customer
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::{ListOptions, error::StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
}

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn list(
        &self,
        customer_id: Uuid,
        opts: &ListOptions,
    ) -> Result<Vec<ProjectRow>, StoreError>;
    async fn create(
        &self,
        customer_id: Uuid,
        fields: ProjectFields,
    ) -> Result<ProjectRow, StoreError>;
    async fn get(&self, customer_id: Uuid, id: Uuid) -> Result<ProjectRow, StoreError>;
    async fn update(
        &self,
        customer_id: Uuid,
        id: Uuid,
        fields: ProjectFields,
    ) -> Result<ProjectRow, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryProjectRepo {
    rows: RwLock<Vec<ProjectRow>>,
}

fn conflict(name: String) -> StoreError {
    StoreError::Conflict {
        resource: "project",
        name,
    }
}

#[async_trait]
impl ProjectRepo for InMemoryProjectRepo {
    async fn list(
        &self,
        customer_id: Uuid,
        opts: &ListOptions,
    ) -> Result<Vec<ProjectRow>, StoreError> {
        let rows = self.rows.read().await;
        let owned = rows.iter().filter(|row| row.customer_id == customer_id);
        Ok(opts.page(owned, |row| row.name.as_str()))
    }

    async fn create(
        &self,
        customer_id: Uuid,
        fields: ProjectFields,
    ) -> Result<ProjectRow, StoreError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|row| row.customer_id == customer_id && row.name == fields.name)
        {
            return Err(conflict(fields.name));
        }

        let now = Utc::now();
        let row = ProjectRow {
            id: Uuid::new_v4(),
            customer_id,
            name: fields.name,
            description: fields.description,
            labels: fields.labels,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, customer_id: Uuid, id: Uuid) -> Result<ProjectRow, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id && row.customer_id == customer_id)
            .cloned()
            .ok_or(StoreError::not_found("project"))
    }

    async fn update(
        &self,
        customer_id: Uuid,
        id: Uuid,
        fields: ProjectFields,
    ) -> Result<ProjectRow, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| {
            row.customer_id == customer_id && row.name == fields.name && row.id != id
        }) {
            return Err(conflict(fields.name));
        }

        let row = rows
            .iter_mut()
            .find(|row| row.id == id && row.customer_id == customer_id)
            .ok_or(StoreError::not_found("project"))?;
        row.name = fields.name;
        row.description = fields.description;
        row.labels = fields.labels;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
