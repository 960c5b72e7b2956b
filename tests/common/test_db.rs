//! Test database utilities for integration tests.
//!
//! Each `TestDatabase` starts a fresh PostgreSQL container, so tests never
//! share tables and can truncate or disable triggers freely.

#![allow(clippy::duplicate_mod)]

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

/// Schema shared by the storage tests: a parent table, a child table with a
/// foreign key to it, and a table exercising the bulk loader's value types.
pub const TEST_SCHEMA: &str = r#"
CREATE TABLE teams (
    id BIGINT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE users (
    id BIGINT PRIMARY KEY,
    team_id BIGINT NOT NULL REFERENCES teams (id),
    email TEXT NOT NULL,
    nickname TEXT
);

CREATE TABLE events (
    id BIGINT PRIMARY KEY,
    kind TEXT NOT NULL,
    active BOOLEAN NOT NULL,
    score DOUBLE PRECISION,
    payload JSONB
);
"#;

/// A test database backed by a Testcontainers PostgreSQL instance.
///
/// The container is stopped when this struct is dropped; keep it alive for
/// the duration of the test.
pub struct TestDatabase {
    pub pool: PgPool,
    _container: ContainerAsync<Postgres>,
}

impl TestDatabase {
    /// Start a container, connect, and create [`TEST_SCHEMA`].
    ///
    /// The `prefix` parameter is used in panic messages only.
    pub async fn new(prefix: &str) -> Self {
        let container = Postgres::default().start().await.unwrap_or_else(|e| {
            panic!("Failed to start PostgreSQL container for {}: {}", prefix, e)
        });

        let host = container
            .get_host()
            .await
            .unwrap_or_else(|e| panic!("Failed to get container host for {}: {}", prefix, e));

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .unwrap_or_else(|e| panic!("Failed to get container port for {}: {}", prefix, e));

        let url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .unwrap_or_else(|e| panic!("Failed to create test pool for {}: {}", prefix, e));

        sqlx::raw_sql(TEST_SCHEMA)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to create test schema for {}: {}", prefix, e));

        Self { pool, _container: container }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Number of rows currently in `table`.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to count rows in {}: {}", table, e))
    }

    /// Seed one team and its users.
    pub async fn seed_team(&self, team_id: i64, user_ids: &[i64]) {
        sqlx::query("INSERT INTO teams (id, name) VALUES ($1, $2)")
            .bind(team_id)
            .bind(format!("team-{}", team_id))
            .execute(&self.pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to seed team {}: {}", team_id, e));

        for user_id in user_ids {
            sqlx::query("INSERT INTO users (id, team_id, email) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(team_id)
                .bind(format!("user{}@example.com", user_id))
                .execute(&self.pool)
                .await
                .unwrap_or_else(|e| panic!("Failed to seed user {}: {}", user_id, e));
        }
    }
}
