use crate::{auth::jwt::verify_token, config::Config, errors::ApiError, model::role::Role};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header::HeaderMap, web::Data,
};
use futures::future::{Ready, ready};
use tracing::info;

/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub employee_id: u64,
    pub username: String,
    pub role: Role,
}

/// Reads `Authorization: Bearer <token>` and verifies it against `secret`.
pub fn extract_auth_user(headers: &HeaderMap, secret: &str) -> Result<AuthUser, ApiError> {
    let header = headers
        .get("Authorization")
        .ok_or_else(|| ApiError::unauthorized("Authorization header not provided"))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header"))?;

    let claims = verify_token(token, secret).map_err(|e| {
        info!(error = %e, "Token rejected");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    Ok(AuthUser {
        employee_id: claims.employee_id,
        username: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already verified by auth_middleware on guarded scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(ApiError::Internal)),
        };

        ready(extract_auth_user(req.headers(), &config.jwt_secret))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Only admin can access"))
        }
    }

    /// Admins may act on anyone; everybody else only on themselves.
    pub fn require_self_or_admin(&self, employee_id: u64) -> Result<(), ApiError> {
        if self.role.is_admin() || self.employee_id == employee_id {
            Ok(())
        } else {
            Err(ApiError::unauthorized(
                "You do not have permission to access this resource",
            ))
        }
    }
}
