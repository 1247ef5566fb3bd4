use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RepoError, RepoResult, Repository};
use crate::model::{
    attendance::{ClockIn, ClockOut, WorkingHours},
    employee::{Employee, EmployeeChanges, NewEmployee},
};

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    clock_ins: Vec<ClockIn>,
    clock_outs: Vec<ClockOut>,
    working_hours: Vec<WorkingHours>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store with the same uniqueness rules as the MySQL schema.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
    failing: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails like a lost database connection.
    pub fn failing() -> Self {
        Self {
            state: Mutex::default(),
            failing: true,
        }
    }

    pub fn working_hours(&self) -> Vec<WorkingHours> {
        self.state.lock().unwrap().working_hours.clone()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> RepoResult<T>) -> RepoResult<T> {
        if self.failing {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_employee(&self, new: NewEmployee) -> RepoResult<Employee> {
        self.with_state(|s| {
            if s
                .employees
                .iter()
                .any(|e| e.username == new.username || e.email == new.email)
            {
                return Err(RepoError::Conflict(format!("employee {}", new.username)));
            }
            let now = Utc::now();
            let employee = Employee {
                id: s.next_id(),
                fullname: new.fullname,
                username: new.username,
                password: new.password_hash,
                email: new.email,
                phone_number: new.phone_number,
                address: new.address,
                role: new.role,
                created_at: now,
                updated_at: now,
            };
            s.employees.push(employee.clone());
            Ok(employee)
        })
    }

    async fn find_employee(&self, id: u64) -> RepoResult<Option<Employee>> {
        self.with_state(|s| Ok(s.employees.iter().find(|e| e.id == id).cloned()))
    }

    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        self.with_state(|s| Ok(s.employees.iter().find(|e| e.username == username).cloned()))
    }

    async fn find_employee_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        self.with_state(|s| Ok(s.employees.iter().find(|e| e.email == email).cloned()))
    }

    async fn find_employee_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<Employee>> {
        self.with_state(|s| {
            Ok(s
                .employees
                .iter()
                .find(|e| e.username == username || e.email == email)
                .cloned())
        })
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> RepoResult<Option<Employee>> {
        self.with_state(|s| {
            let clash = s.employees.iter().any(|e| {
                e.id != id
                    && (changes.username.as_deref() == Some(e.username.as_str())
                        || changes.email.as_deref() == Some(e.email.as_str()))
            });
            if clash {
                return Err(RepoError::Conflict(format!("employee {id}")));
            }

            let Some(employee) = s.employees.iter_mut().find(|e| e.id == id) else {
                return Ok(None);
            };
            if changes.is_empty() {
                return Ok(Some(employee.clone()));
            }
            if let Some(v) = changes.fullname {
                employee.fullname = v;
            }
            if let Some(v) = changes.username {
                employee.username = v;
            }
            if let Some(v) = changes.password_hash {
                employee.password = v;
            }
            if let Some(v) = changes.email {
                employee.email = v;
            }
            if let Some(v) = changes.phone_number {
                employee.phone_number = v;
            }
            if let Some(v) = changes.address {
                employee.address = v;
            }
            if let Some(v) = changes.role {
                employee.role = v;
            }
            employee.updated_at = Utc::now();
            Ok(Some(employee.clone()))
        })
    }

    async fn delete_employee(&self, id: u64) -> RepoResult<bool> {
        self.with_state(|s| {
            let before = s.employees.len();
            s.employees.retain(|e| e.id != id);
            Ok(s.employees.len() < before)
        })
    }

    async fn list_employees(&self, offset: u64, limit: u64) -> RepoResult<Vec<Employee>> {
        self.with_state(|s| {
            Ok(s.employees
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        })
    }

    async fn search_employees(&self, query: &str) -> RepoResult<Vec<Employee>> {
        let needle = query.to_lowercase();
        self.with_state(|s| {
            Ok(s.employees
                .iter()
                .filter(|e| {
                    e.fullname.to_lowercase().contains(&needle)
                        || e.username.to_lowercase().contains(&needle)
                        || e.email.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect())
        })
    }

    async fn insert_clock_in(&self, employee_id: u64, at: DateTime<Utc>) -> RepoResult<ClockIn> {
        self.with_state(|s| {
            let clock_in = ClockIn {
                id: s.next_id(),
                employee_id,
                clock_in_time: at,
                created_at: at,
            };
            s.clock_ins.push(clock_in.clone());
            Ok(clock_in)
        })
    }

    async fn last_clock_in(&self, employee_id: u64) -> RepoResult<Option<ClockIn>> {
        self.with_state(|s| {
            Ok(s.clock_ins
                .iter()
                .filter(|c| c.employee_id == employee_id)
                .max_by_key(|c| c.id)
                .cloned())
        })
    }

    async fn find_clock_out_for(&self, clock_in_id: u64) -> RepoResult<Option<ClockOut>> {
        self.with_state(|s| {
            Ok(s.clock_outs
                .iter()
                .find(|c| c.clock_in_id == clock_in_id)
                .cloned())
        })
    }

    async fn insert_clock_out(
        &self,
        employee_id: u64,
        clock_in_id: u64,
        at: DateTime<Utc>,
    ) -> RepoResult<ClockOut> {
        self.with_state(|s| {
            if s.clock_outs.iter().any(|c| c.clock_in_id == clock_in_id) {
                return Err(RepoError::Conflict(format!("clock_in_id {clock_in_id}")));
            }
            let clock_out = ClockOut {
                id: s.next_id(),
                employee_id,
                clock_in_id,
                clock_out_time: at,
                created_at: at,
            };
            s.clock_outs.push(clock_out.clone());
            Ok(clock_out)
        })
    }

    async fn insert_working_hours(
        &self,
        employee_id: u64,
        hours_worked: &str,
    ) -> RepoResult<WorkingHours> {
        self.with_state(|s| {
            let row = WorkingHours {
                id: s.next_id(),
                employee_id,
                hours_worked: hours_worked.to_string(),
                created_at: Utc::now(),
            };
            s.working_hours.push(row.clone());
            Ok(row)
        })
    }

    async fn clock_ins_for(&self, employee_id: u64) -> RepoResult<Vec<ClockIn>> {
        self.with_state(|s| {
            Ok(s.clock_ins
                .iter()
                .filter(|c| c.employee_id == employee_id)
                .cloned()
                .collect())
        })
    }

    async fn clock_outs_for(&self, employee_id: u64) -> RepoResult<Vec<ClockOut>> {
        self.with_state(|s| {
            Ok(s.clock_outs
                .iter()
                .filter(|c| c.employee_id == employee_id)
                .cloned()
                .collect())
        })
    }
}
