use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClockIn {
    pub id: u64,
    pub employee_id: u64,
    pub clock_in_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Closes exactly one [`ClockIn`], referenced by `clock_in_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClockOut {
    pub id: u64,
    pub employee_id: u64,
    pub clock_in_id: u64,
    pub clock_out_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized shift length written at clock-out, e.g. `"8 hour(s) 15 minute(s)"`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkingHours {
    pub id: u64,
    pub employee_id: u64,
    pub hours_worked: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockType {
    ClockIn,
    ClockOut,
    WorkHours,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 12,
        "employee_id": 3,
        "clock_type": "clock_out",
        "clock_time": "2026-01-05T17:02:11Z",
        "hours": 8,
        "minutes": 47
    })
)]
pub struct ClockResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub employee_id: u64,
    pub clock_type: ClockType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    /// Fractional hours summed over all closed shifts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
}
