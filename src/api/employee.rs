use crate::{
    auth::{auth::AuthUser, handlers::insert_employee, password::hash_password},
    errors::ApiError,
    model::{
        employee::{EmployeeChanges, EmployeeResponse},
        role::Role,
    },
    models::{EmployeeReqDto, MessageResponse},
    repository::Repository,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Rows per page, 1..=100
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Resolves `(page, limit, offset)`, clamping out-of-range values.
    pub fn resolve(&self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit, (page - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched as a substring of fullname, username or email
    pub query: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeResponse>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub limit: u64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    /// Admin only
    pub role: Option<Role>,
}

/// Trims a required field; an empty value is rejected.
fn required(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(ApiError::bad_request(format!("{field} must not be empty"))),
        other => Ok(other),
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeeReqDto,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Missing fields, or username/email taken", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee"
)]
#[instrument(skip_all, fields(username = %payload.username))]
pub async fn create_employee(
    caller: Option<AuthUser>,
    repo: web::Data<dyn Repository>,
    payload: web::Json<EmployeeReqDto>,
) -> Result<HttpResponse, ApiError> {
    let dto = payload.into_inner();

    // Open endpoint; only an authenticated admin picks the role
    let role = match (&caller, dto.role) {
        (Some(user), Some(role)) if user.role.is_admin() => role,
        _ => Role::User,
    };

    let employee = insert_employee(repo.get_ref(), dto, role).await?;

    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Caller is not an admin", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn list_employees(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let (page, limit, offset) = query.resolve();
    let employees = repo.list_employees(offset, limit).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees.into_iter().map(EmployeeResponse::from).collect(),
        page,
        limit,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Caller is not an admin", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn get_employee(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    let employee = repo
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee)))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Empty field, or username/email taken", body = crate::errors::ErrorResponse),
        (status = 401, description = "Not the employee or an admin", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(auth, repo, body), fields(caller = auth.employee_id))]
pub async fn update_employee(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let body = body.into_inner();
    if body.role.is_some() && !auth.role.is_admin() {
        return Err(ApiError::unauthorized("Only admin can change role"));
    }

    let username = required("username", body.username)?;
    let email = required("email", body.email)?;
    if email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    if let Some(username) = &username {
        if let Some(other) = repo.find_employee_by_username(username).await? {
            if other.id != employee_id {
                return Err(ApiError::bad_request("Username already exists"));
            }
        }
    }
    if let Some(email) = &email {
        if let Some(other) = repo.find_employee_by_email(email).await? {
            if other.id != employee_id {
                return Err(ApiError::bad_request("Email already exists"));
            }
        }
    }

    let password_hash = match body.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(&password).map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::Internal
        })?),
        None => None,
    };

    let changes = EmployeeChanges {
        fullname: required("fullname", body.fullname)?,
        username,
        password_hash,
        email,
        phone_number: body.phone_number.map(|v| v.trim().to_string()),
        address: body.address.map(|v| v.trim().to_string()),
        role: body.role,
    };

    let employee = repo
        .update_employee(employee_id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    info!("Employee updated");
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee)))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse),
        (status = 401, description = "Caller is not an admin", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn delete_employee(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    if !repo.delete_employee(employee_id).await? {
        return Err(ApiError::not_found("Employee not found"));
    }

    info!(employee_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Employee deleted successfully".to_string(),
    }))
}

/// Search Employees
#[utoipa::path(
    get,
    path = "/api/v1/employees/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching employees", body = [EmployeeResponse]),
        (status = 400, description = "Missing query", body = crate::errors::ErrorResponse),
        (status = 401, description = "Caller is not an admin", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn search_employees(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let needle = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("query parameter is required"))?;

    let employees = repo.search_employees(needle).await?;

    Ok(HttpResponse::Ok().json(
        employees
            .into_iter()
            .map(EmployeeResponse::from)
            .collect::<Vec<_>>(),
    ))
}
