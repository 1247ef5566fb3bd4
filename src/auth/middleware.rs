use crate::auth::auth::extract_auth_user;
use crate::config::Config;
use crate::errors::ApiError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::debug;

/// Rejects requests without a valid bearer token and stores the caller as
/// [`AuthUser`](crate::auth::auth::AuthUser) in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let auth_user = match extract_auth_user(req.headers(), &config.jwt_secret) {
        Ok(user) => user,
        Err(e) => {
            debug!(path = %req.path(), error = %e, "Rejected unauthenticated request");
            let resp = ApiError::error_response(&e);
            return Ok(req.into_response(resp));
        }
    };

    debug!(employee_id = auth_user.employee_id, role = %auth_user.role, "Authenticated");
    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
