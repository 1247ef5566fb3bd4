use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane_doe")]
    pub username: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
}

/// Body for `POST /register` and `POST /employees`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeReqDto {
    #[schema(example = "Jane Doe")]
    pub fullname: String,
    #[schema(example = "jane_doe")]
    pub username: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "+62812345678")]
    pub phone_number: String,
    #[serde(default)]
    #[schema(example = "Jl. Merdeka 1")]
    pub address: String,
    /// Honoured only when an admin creates the employee
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Employee deleted successfully")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// username
    pub sub: String,
    pub employee_id: u64,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
