/*
 * Responsibility
 * - Customers request/response DTOs
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::customer_repo::{CustomerFields, CustomerRow};

/// Body of POST /customers and PUT /customers/{id}.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl CustomerRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        Ok(())
    }

    pub fn into_fields(self) -> CustomerFields {
        CustomerFields {
            name: self.name.trim().to_string(),
            description: self.description,
            labels: self.labels,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for CustomerResponse {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            labels: row.labels,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomersPage {
    pub customers: Vec<CustomerResponse>,
}
