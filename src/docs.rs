use crate::api::employee::{EmployeeListResponse, UpdateEmployee};
use crate::errors::ErrorResponse;
use crate::model::attendance::{ClockResponse, ClockType};
use crate::model::employee::EmployeeResponse;
use crate::model::role::Role;
use crate::models::{EmployeeReqDto, LoginReqDto, MessageResponse, TokenResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

// Handler paths are written against the default `/api/v1` prefix
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Employees log in, clock in and out of shifts, and read their accumulated work hours.
Administrators manage employee records.

### Security
Send the token from `POST /login` as `Authorization: Bearer <token>`.
Listing, reading, searching and deleting employees is admin only.

### Errors
Every failure answers with `{"error": "<message>"}`.

### Paths
Documented paths assume the default `API_PREFIX` of `/api/v1`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::search_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::work_hours
    ),
    components(
        schemas(
            LoginReqDto,
            TokenResponse,
            EmployeeReqDto,
            UpdateEmployee,
            EmployeeResponse,
            EmployeeListResponse,
            MessageResponse,
            ErrorResponse,
            ClockResponse,
            ClockType,
            Role
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and self-registration"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Clock-in, clock-out and work hours"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/login",
            "/api/v1/register",
            "/api/v1/employees",
            "/api/v1/employees/search",
            "/api/v1/employees/{id}",
            "/api/v1/attendance/clock-in/{id}",
            "/api/v1/attendance/clock-out/{id}",
            "/api/v1/attendance/work-hours/{id}",
        ] {
            assert!(paths.iter().any(|p| *p == expected), "missing {expected}");
        }
        assert!(
            doc.components
                .unwrap()
                .security_schemes
                .contains_key("bearer_auth")
        );
    }
}
