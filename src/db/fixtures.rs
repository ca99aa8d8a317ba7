// src/db/fixtures.rs
// DOCUMENTATION: Row builders for database-backed tests
// PURPOSE: Seed users, profiles, homes, caregivers, listings and leads

use crate::auth::{AuthenticatedUser, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn user(pool: &PgPool, role: UserRole) -> AuthenticatedUser {
    let id = Uuid::new_v4();
    let email = format!("{}@carelink.test", id.simple());
    sqlx::query(
        "INSERT INTO users (id, email, first_name, last_name, role) VALUES ($1, $2, 'Test', 'User', $3)",
    )
    .bind(id)
    .bind(&email)
    .bind(role.as_str())
    .execute(pool)
    .await
    .expect("insert user");

    AuthenticatedUser {
        id,
        email,
        first_name: "Test".into(),
        last_name: "User".into(),
        role,
    }
}

pub async fn family(pool: &PgPool, user_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as("INSERT INTO families (user_id) VALUES ($1) RETURNING id")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("insert family");
    row.0
}

pub async fn operator(pool: &PgPool, user_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO operators (user_id, company_name) VALUES ($1, 'Sunrise Care') RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .expect("insert operator");
    row.0
}

pub async fn home(pool: &PgPool, operator_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO homes (operator_id, name, city, state) VALUES ($1, 'Maple House', 'Austin', 'TX') RETURNING id",
    )
    .bind(operator_id)
    .fetch_one(pool)
    .await
    .expect("insert home");
    row.0
}

/// Caregiver profile created `age_secs` seconds ago
pub async fn caregiver(pool: &PgPool, user_id: Uuid, age_secs: f64) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO caregivers (user_id, created_at, updated_at)
        VALUES ($1, NOW() - make_interval(secs => $2), NOW())
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(age_secs)
    .fetch_one(pool)
    .await
    .expect("insert caregiver");
    row.0
}

pub async fn employ(pool: &PgPool, caregiver_id: Uuid, operator_id: Uuid) {
    sqlx::query("INSERT INTO caregiver_employments (caregiver_id, operator_id) VALUES ($1, $2)")
        .bind(caregiver_id)
        .bind(operator_id)
        .execute(pool)
        .await
        .expect("insert employment");
}

pub async fn listing(pool: &PgPool) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO marketplace_listings (title, city, state) VALUES ('Overnight companion', 'Austin', 'TX') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("insert listing");
    row.0
}

pub async fn lead(pool: &PgPool, family_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO leads (family_id, target_type, message) VALUES ($1, 'AIDE', 'Looking for weekend help') RETURNING id",
    )
    .bind(family_id)
    .fetch_one(pool)
    .await
    .expect("insert lead");
    row.0
}
