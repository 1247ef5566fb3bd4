use crate::{
    auth::{
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    errors::ApiError,
    model::{
        employee::{Employee, EmployeeResponse, NewEmployee},
        role::Role,
    },
    models::{EmployeeReqDto, LoginReqDto, TokenResponse},
    repository::Repository,
};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

// auth end points

/// Validates `dto`, rejects taken usernames/emails, hashes the password and inserts the row.
pub async fn insert_employee(
    repo: &dyn Repository,
    dto: EmployeeReqDto,
    role: Role,
) -> Result<Employee, ApiError> {
    let fullname = dto.fullname.trim();
    let username = dto.username.trim();
    let email = dto.email.trim();

    if fullname.is_empty() || username.is_empty() || email.is_empty() || dto.password.is_empty() {
        return Err(ApiError::bad_request(
            "Fullname, username, email and password are required",
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    if let Some(existing) = repo
        .find_employee_by_username_or_email(username, email)
        .await?
    {
        if existing.username == username {
            return Err(ApiError::bad_request("Username already exists"));
        }
        return Err(ApiError::bad_request("Email already exists"));
    }

    let password_hash = hash_password(&dto.password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::Internal
    })?;

    let employee = repo
        .insert_employee(NewEmployee {
            fullname: fullname.to_string(),
            username: username.to_string(),
            password_hash,
            email: email.to_string(),
            phone_number: dto.phone_number.trim().to_string(),
            address: dto.address.trim().to_string(),
            role,
        })
        .await?;

    info!(employee_id = employee.id, role = %employee.role, "Employee created");
    Ok(employee)
}

/// Register
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = EmployeeReqDto,
    responses(
        (status = 201, description = "Registered; role is always `user`", body = EmployeeResponse),
        (status = 400, description = "Missing fields, or username/email taken", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(repo, payload), fields(username = %payload.username))]
pub async fn register(
    repo: web::Data<dyn Repository>,
    payload: web::Json<EmployeeReqDto>,
) -> Result<HttpResponse, ApiError> {
    let employee = insert_employee(repo.get_ref(), payload.into_inner(), Role::User).await?;

    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

/// Login
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Signed bearer token", body = TokenResponse),
        (status = 400, description = "Username or password missing", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid username or password", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(repo, config, payload), fields(username = %payload.username))]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    repo: web::Data<dyn Repository>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::bad_request("Username and password are required"));
    }

    // Same message for unknown user and wrong password
    let invalid = || ApiError::unauthorized("Invalid username or password");

    let Some(employee) = repo
        .find_employee_by_username(payload.username.trim())
        .await?
    else {
        info!("Invalid credentials: user not found");
        return Err(invalid());
    };

    debug!(employee_id = employee.id, "Verifying password");
    if let Err(e) = verify_password(&payload.password, &employee.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(invalid());
    }

    let token = generate_token(
        employee.id,
        employee.username.clone(),
        employee.role,
        &config.jwt_secret,
        config.token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Token generation failed");
        ApiError::Internal
    })?;

    info!(employee_id = employee.id, "Login successful");

    Ok(HttpResponse::Ok().json(TokenResponse {
        username: employee.username,
        email: employee.email,
        role: employee.role,
        token,
    }))
}
