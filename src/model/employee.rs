use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Employee row as stored. `password` holds the PHC hash string and never leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub fullname: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new employee row; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub fullname: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub role: Role,
}

/// Column changes for a partial update. `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none()
            && self.username.is_none()
            && self.password_hash.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "fullname": "Jane Doe",
        "username": "jane_doe",
        "email": "jane@company.com",
        "phone_number": "+62812345678",
        "address": "Jl. Merdeka 1",
        "role": "admin",
        "created_at": "2026-01-01T08:00:00Z",
        "updated_at": "2026-01-01T08:00:00Z"
    })
)]
pub struct EmployeeResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub fullname: String,
    #[schema(example = "jane_doe")]
    pub username: String,
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[schema(example = "+62812345678")]
    pub phone_number: String,
    #[schema(example = "Jl. Merdeka 1")]
    pub address: String,
    pub role: Role,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            fullname: e.fullname,
            username: e.username,
            email: e.email,
            phone_number: e.phone_number,
            address: e.address,
            role: e.role,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
