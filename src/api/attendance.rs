use crate::{
    auth::auth::AuthUser,
    errors::ApiError,
    model::attendance::{ClockResponse, ClockType},
    repository::{RepoError, Repository},
    utils::work_time::{ShiftLength, total_hours},
};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{info, instrument};

/// Authorizes the caller for `employee_id` and checks the employee still exists.
async fn target_employee(
    auth: &AuthUser,
    repo: &dyn Repository,
    employee_id: u64,
) -> Result<(), ApiError> {
    auth.require_self_or_admin(employee_id)?;
    repo.find_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    Ok(())
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in/{id}",
    params(
        ("id", Path, description = "Employee ID; must be the caller unless the caller is an admin")
    ),
    responses(
        (status = 200, description = "Clocked in", body = ClockResponse, example = json!({
            "id": 11,
            "employee_id": 3,
            "clock_type": "clock_in",
            "clock_time": "2026-01-05T08:15:00Z"
        })),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn clock_in(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    target_employee(&auth, repo.get_ref(), employee_id).await?;

    let clock_in = repo.insert_clock_in(employee_id, Utc::now()).await?;
    info!(clock_in_id = clock_in.id, "Clocked in");

    Ok(HttpResponse::Ok().json(ClockResponse {
        id: Some(clock_in.id),
        employee_id,
        clock_type: ClockType::ClockIn,
        clock_time: Some(clock_in.clock_in_time),
        hours: None,
        minutes: None,
        hours_worked: None,
    }))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-out/{id}",
    params(
        ("id", Path, description = "Employee ID; must be the caller unless the caller is an admin")
    ),
    responses(
        (status = 200, description = "Clocked out; hours and minutes of the closed shift", body = ClockResponse),
        (status = 400, description = "No clock-in, or the last shift is already closed", body = crate::errors::ErrorResponse, example = json!({
            "error": "You have already clocked out for this shift"
        })),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn clock_out(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    target_employee(&auth, repo.get_ref(), employee_id).await?;

    let last_clock_in = repo
        .last_clock_in(employee_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("No clock-in found"))?;

    let already_closed = || ApiError::bad_request("You have already clocked out for this shift");

    if repo.find_clock_out_for(last_clock_in.id).await?.is_some() {
        return Err(already_closed());
    }

    // UNIQUE(clock_in_id) catches a concurrent clock-out that slipped past the check above
    let clock_out = match repo
        .insert_clock_out(employee_id, last_clock_in.id, Utc::now())
        .await
    {
        Ok(c) => c,
        Err(RepoError::Conflict(_)) => return Err(already_closed()),
        Err(e) => return Err(e.into()),
    };

    let shift = ShiftLength::between(last_clock_in.clock_in_time, clock_out.clock_out_time);
    repo.insert_working_hours(employee_id, &shift.describe())
        .await?;

    info!(
        clock_in_id = last_clock_in.id,
        clock_out_id = clock_out.id,
        hours = shift.hours,
        minutes = shift.minutes,
        "Clocked out"
    );

    Ok(HttpResponse::Ok().json(ClockResponse {
        id: Some(clock_out.id),
        employee_id,
        clock_type: ClockType::ClockOut,
        clock_time: Some(clock_out.clock_out_time),
        hours: Some(shift.hours),
        minutes: Some(shift.minutes),
        hours_worked: None,
    }))
}

/// Work-hours endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/work-hours/{id}",
    params(
        ("id", Path, description = "Employee ID; must be the caller unless the caller is an admin")
    ),
    responses(
        (status = 200, description = "Total hours over all closed shifts", body = ClockResponse, example = json!({
            "employee_id": 3,
            "clock_type": "work_hours",
            "hours_worked": 37.75
        })),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(auth, repo), fields(caller = auth.employee_id))]
pub async fn work_hours(
    auth: AuthUser,
    repo: web::Data<dyn Repository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    target_employee(&auth, repo.get_ref(), employee_id).await?;

    let clock_ins = repo.clock_ins_for(employee_id).await?;
    let clock_outs = repo.clock_outs_for(employee_id).await?;

    Ok(HttpResponse::Ok().json(ClockResponse {
        id: None,
        employee_id,
        clock_type: ClockType::WorkHours,
        clock_time: None,
        hours: None,
        minutes: None,
        hours_worked: Some(total_hours(&clock_ins, &clock_outs)),
    }))
}
