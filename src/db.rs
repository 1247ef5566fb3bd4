use sqlx::{MySqlPool, mysql::MySqlPoolOptions};
use tracing::info;

use crate::{
    auth::password::hash_password,
    config::AdminSeed,
    model::{employee::NewEmployee, role::Role},
    repository::Repository,
};

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        fullname VARCHAR(255) NOT NULL,
        username VARCHAR(100) NOT NULL,
        password VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone_number VARCHAR(50) NOT NULL DEFAULT '',
        address VARCHAR(500) NOT NULL DEFAULT '',
        role VARCHAR(20) NOT NULL DEFAULT 'user',
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_employees_username (username),
        UNIQUE KEY uq_employees_email (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clock_ins (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        clock_in_time DATETIME(6) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        KEY idx_clock_ins_employee (employee_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clock_outs (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        clock_in_id BIGINT UNSIGNED NOT NULL,
        clock_out_time DATETIME(6) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_clock_outs_clock_in (clock_in_id),
        KEY idx_clock_outs_employee (employee_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS working_hours (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        hours_worked VARCHAR(64) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        KEY idx_working_hours_employee (employee_id)
    )
    "#,
];

/// Creates any missing tables. Existing tables are left untouched.
pub async fn migrate(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "Schema ready");
    Ok(())
}

/// Creates the bootstrap admin unless an employee with that username exists.
/// Returns whether a row was inserted.
pub async fn seed_admin(repo: &dyn Repository, seed: &AdminSeed) -> anyhow::Result<bool> {
    if repo.find_employee_by_username(&seed.username).await?.is_some() {
        info!(username = %seed.username, "Admin already present, skipping seed");
        return Ok(false);
    }

    let password_hash =
        hash_password(&seed.password).map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;

    let admin = repo
        .insert_employee(NewEmployee {
            fullname: "Administrator".to_string(),
            username: seed.username.clone(),
            password_hash,
            email: seed.email.clone(),
            phone_number: String::new(),
            address: String::new(),
            role: Role::Admin,
        })
        .await?;

    info!(employee_id = admin.id, username = %admin.username, "Admin seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, repository::memory::MemoryRepository};

    fn seed() -> AdminSeed {
        AdminSeed {
            username: "root".into(),
            password: "changeme".into(),
            email: "root@company.com".into(),
        }
    }

    #[actix_web::test]
    async fn seeds_admin_once_with_hashed_password() {
        let repo = MemoryRepository::new();

        assert!(seed_admin(&repo, &seed()).await.unwrap());
        assert!(!seed_admin(&repo, &seed()).await.unwrap());

        let admin = repo.find_employee_by_username("root").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_ne!(admin.password, "changeme");
        assert!(verify_password("changeme", &admin.password).is_ok());
    }
}
