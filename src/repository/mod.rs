//! Data access for employees and attendance rows.
//!
//! Handlers only see the [`Repository`] trait; the MySQL implementation lives in
//! [`mysql`], and tests run against the in-memory one in [`memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    attendance::{ClockIn, ClockOut, WorkingHours},
    employee::{Employee, EmployeeChanges, NewEmployee},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A UNIQUE index rejected the write.
    #[error("duplicate entry: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait Repository: Send + Sync {
    // employees
    async fn insert_employee(&self, new: NewEmployee) -> RepoResult<Employee>;
    async fn find_employee(&self, id: u64) -> RepoResult<Option<Employee>>;
    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>>;
    async fn find_employee_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// First employee whose username or email matches either argument.
    async fn find_employee_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<Employee>>;
    /// Applies `changes` and returns the updated row, `None` when `id` does not exist.
    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> RepoResult<Option<Employee>>;
    /// Returns `false` when nothing was deleted.
    async fn delete_employee(&self, id: u64) -> RepoResult<bool>;
    async fn list_employees(&self, offset: u64, limit: u64) -> RepoResult<Vec<Employee>>;
    /// Substring match on fullname, username or email.
    async fn search_employees(&self, query: &str) -> RepoResult<Vec<Employee>>;

    // attendance
    async fn insert_clock_in(&self, employee_id: u64, at: DateTime<Utc>) -> RepoResult<ClockIn>;
    async fn last_clock_in(&self, employee_id: u64) -> RepoResult<Option<ClockIn>>;
    async fn find_clock_out_for(&self, clock_in_id: u64) -> RepoResult<Option<ClockOut>>;
    async fn insert_clock_out(
        &self,
        employee_id: u64,
        clock_in_id: u64,
        at: DateTime<Utc>,
    ) -> RepoResult<ClockOut>;
    async fn insert_working_hours(
        &self,
        employee_id: u64,
        hours_worked: &str,
    ) -> RepoResult<WorkingHours>;
    async fn clock_ins_for(&self, employee_id: u64) -> RepoResult<Vec<ClockIn>>;
    async fn clock_outs_for(&self, employee_id: u64) -> RepoResult<Vec<ClockOut>>;
}
