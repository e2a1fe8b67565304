/*
 * Responsibility
 * - customers CRUD (no delete)
 * - name is unique: create/update with a taken name is a Conflict
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::{ListOptions, error::StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
}

#[async_trait]
pub trait CustomerRepo: Send + Sync {
    async fn list(&self, opts: &ListOptions) -> Result<Vec<CustomerRow>, StoreError>;
    async fn create(&self, fields: CustomerFields) -> Result<CustomerRow, StoreError>;
    async fn get(&self, id: Uuid) -> Result<CustomerRow, StoreError>;
    async fn update(&self, id: Uuid, fields: CustomerFields) -> Result<CustomerRow, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCustomerRepo {
    rows: RwLock<Vec<CustomerRow>>,
}

fn name_taken(rows: &[CustomerRow], name: &str, except: Option<Uuid>) -> bool {
    rows.iter()
        .any(|row| row.name == name && Some(row.id) != except)
}

#[async_trait]
impl CustomerRepo for InMemoryCustomerRepo {
    async fn list(&self, opts: &ListOptions) -> Result<Vec<CustomerRow>, StoreError> {
        let rows = self.rows.read().await;
        Ok(opts.page(rows.iter(), |row| row.name.as_str()))
    }

    async fn create(&self, fields: CustomerFields) -> Result<CustomerRow, StoreError> {
        let mut rows = self.rows.write().await;
        if name_taken(&rows, &fields.name, None) {
            return Err(StoreError::Conflict {
                resource: "customer",
                name: fields.name,
            });
        }

        let now = Utc::now();
        let row = CustomerRow {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            labels: fields.labels,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<CustomerRow, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StoreError::not_found("customer"))
    }

    async fn update(&self, id: Uuid, fields: CustomerFields) -> Result<CustomerRow, StoreError> {
        let mut rows = self.rows.write().await;
        if name_taken(&rows, &fields.name, Some(id)) {
            return Err(StoreError::Conflict {
                resource: "customer",
                name: fields.name,
            });
        }

        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::not_found("customer"))?;
        row.name = fields.name;
        row.description = fields.description;
        row.labels = fields.labels;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
