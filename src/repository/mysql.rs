use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tracing::debug;

use super::{RepoError, RepoResult, Repository};
use crate::{
    model::{
        attendance::{ClockIn, ClockOut, WorkingHours},
        employee::{Employee, EmployeeChanges, NewEmployee},
    },
    utils::db_utils::{SqlValue, build_update_sql, execute_update},
};

const EMPLOYEE_COLUMNS: &str = "id, fullname, username, password, email, phone_number, address, role, created_at, updated_at";

pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// MySQL reports every integrity violation, duplicate keys included, as SQLSTATE 23000.
fn map_write_error(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23000") {
            return RepoError::Conflict(db_err.message().to_string());
        }
    }
    RepoError::Database(e)
}

fn employee_assignments(changes: EmployeeChanges, now: DateTime<Utc>) -> Vec<(&'static str, SqlValue)> {
    let mut assignments = Vec::new();

    if let Some(v) = changes.fullname {
        assignments.push(("fullname", SqlValue::String(v)));
    }
    if let Some(v) = changes.username {
        assignments.push(("username", SqlValue::String(v)));
    }
    if let Some(v) = changes.password_hash {
        assignments.push(("password", SqlValue::String(v)));
    }
    if let Some(v) = changes.email {
        assignments.push(("email", SqlValue::String(v)));
    }
    if let Some(v) = changes.phone_number {
        assignments.push(("phone_number", SqlValue::String(v)));
    }
    if let Some(v) = changes.address {
        assignments.push(("address", SqlValue::String(v)));
    }
    if let Some(v) = changes.role {
        assignments.push(("role", SqlValue::String(v.as_ref().to_string())));
    }

    if !assignments.is_empty() {
        assignments.push(("updated_at", SqlValue::DateTime(now)));
    }
    assignments
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert_employee(&self, new: NewEmployee) -> RepoResult<Employee> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (fullname, username, password, email, phone_number, address, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.fullname)
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(&new.address)
        .bind(new.role.as_ref())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_id();
        debug!(employee_id = id, "Employee inserted");

        self.find_employee(id)
            .await?
            .ok_or(RepoError::Database(sqlx::Error::RowNotFound))
    }

    async fn find_employee(&self, id: u64) -> RepoResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE username = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE username = ? OR email = ? ORDER BY id LIMIT 1"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> RepoResult<Option<Employee>> {
        let assignments = employee_assignments(changes, Utc::now());

        if let Some(update) = build_update_sql("employees", assignments, "id", id) {
            debug!(sql = %update.sql, employee_id = id, "Updating employee");
            execute_update(&self.pool, update)
                .await
                .map_err(map_write_error)?;
        }

        // rows_affected is 0 for a no-op update too, so existence is checked by re-reading
        self.find_employee(id).await
    }

    async fn delete_employee(&self, id: u64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_employees(&self, offset: u64, limit: u64) -> RepoResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id LIMIT ? OFFSET ?");
        debug!(sql = %sql, offset, limit, "Fetching employees");

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn search_employees(&self, query: &str) -> RepoResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE fullname LIKE ? ESCAPE '!' OR username LIKE ? ESCAPE '!' \
             OR email LIKE ? ESCAPE '!' ORDER BY id"
        );
        let like = contains_pattern(query);

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(&like)
            .bind(&like)
            .bind(&like)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn insert_clock_in(&self, employee_id: u64, at: DateTime<Utc>) -> RepoResult<ClockIn> {
        let result = sqlx::query(
            "INSERT INTO clock_ins (employee_id, clock_in_time, created_at) VALUES (?, ?, ?)",
        )
        .bind(employee_id)
        .bind(at)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(ClockIn {
            id: result.last_insert_id(),
            employee_id,
            clock_in_time: at,
            created_at: at,
        })
    }

    async fn last_clock_in(&self, employee_id: u64) -> RepoResult<Option<ClockIn>> {
        let clock_in = sqlx::query_as::<_, ClockIn>(
            r#"
            SELECT id, employee_id, clock_in_time, created_at
            FROM clock_ins
            WHERE employee_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(clock_in)
    }

    async fn find_clock_out_for(&self, clock_in_id: u64) -> RepoResult<Option<ClockOut>> {
        let clock_out = sqlx::query_as::<_, ClockOut>(
            r#"
            SELECT id, employee_id, clock_in_id, clock_out_time, created_at
            FROM clock_outs
            WHERE clock_in_id = ?
            "#,
        )
        .bind(clock_in_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(clock_out)
    }

    async fn insert_clock_out(
        &self,
        employee_id: u64,
        clock_in_id: u64,
        at: DateTime<Utc>,
    ) -> RepoResult<ClockOut> {
        let result = sqlx::query(
            r#"
            INSERT INTO clock_outs (employee_id, clock_in_id, clock_out_time, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(clock_in_id)
        .bind(at)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(ClockOut {
            id: result.last_insert_id(),
            employee_id,
            clock_in_id,
            clock_out_time: at,
            created_at: at,
        })
    }

    async fn insert_working_hours(
        &self,
        employee_id: u64,
        hours_worked: &str,
    ) -> RepoResult<WorkingHours> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO working_hours (employee_id, hours_worked, created_at) VALUES (?, ?, ?)",
        )
        .bind(employee_id)
        .bind(hours_worked)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(WorkingHours {
            id: result.last_insert_id(),
            employee_id,
            hours_worked: hours_worked.to_string(),
            created_at: now,
        })
    }

    async fn clock_ins_for(&self, employee_id: u64) -> RepoResult<Vec<ClockIn>> {
        let rows = sqlx::query_as::<_, ClockIn>(
            "SELECT id, employee_id, clock_in_time, created_at FROM clock_ins WHERE employee_id = ? ORDER BY id",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn clock_outs_for(&self, employee_id: u64) -> RepoResult<Vec<ClockOut>> {
        let rows = sqlx::query_as::<_, ClockOut>(
            r#"
            SELECT id, employee_id, clock_in_id, clock_out_time, created_at
            FROM clock_outs
            WHERE employee_id = ?
            ORDER BY id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// `LIKE` pattern matching `needle` literally anywhere in the column.
/// `!` is the escape character.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '!' | '%' | '_') {
            pattern.push('!');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
