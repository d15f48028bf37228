//! Shared test infrastructure.
//!
//! `setup_test_db()` opens a fresh in-memory SQLite database and applies the
//! schema, so every test starts from a clean slate. Fixtures are built
//! explicitly per test with the builders below; nothing is shared between
//! test functions.

use sqlx::sqlite::SqlitePoolOptions;

use pollsapi::auth::password;
use pollsapi::db::{self, DbPool};
use pollsapi::models::user::{self, NewUser, User};
use pollsapi::models::{choice, poll};

pub const TEST_PASSWORD: &str = "12345678";

pub struct TestDb {
    pool: DbPool,
}

impl TestDb {
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Open an in-memory database and run migrations.
///
/// The pool is capped at one connection: every pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn setup_test_db() -> TestDb {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql("PRAGMA foreign_keys=ON;")
        .execute(&pool)
        .await
        .expect("Failed to set pragmas");

    db::run_migrations(&pool).await.expect("Failed to run migrations");

    TestDb { pool }
}

/// Explicit per-test user construction.
pub struct UserBuilder {
    username: String,
    email: String,
    password: String,
    staff: bool,
}

impl UserBuilder {
    pub fn new(username: &str) -> Self {
        UserBuilder {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password: TEST_PASSWORD.to_string(),
            staff: false,
        }
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn staff(mut self) -> Self {
        self.staff = true;
        self
    }

    pub async fn create(self, pool: &DbPool) -> User {
        let hash = password::hash_password(&self.password).expect("hash");
        let id = user::create(
            pool,
            &NewUser {
                username: self.username,
                email: self.email,
                password: hash,
            },
        )
        .await
        .expect("create user");

        if self.staff {
            user::set_staff(pool, id, true).await.expect("set staff");
        }

        user::find_by_id(pool, id)
            .await
            .expect("query user")
            .expect("user not found after create")
    }
}

/// A poll plus its choices, as one explicit fixture.
pub struct PollFixture {
    pub poll: poll::Poll,
    pub choices: Vec<choice::Choice>,
}

pub struct PollBuilder {
    owner: i64,
    question: String,
    choices: Vec<String>,
}

impl PollBuilder {
    pub fn new(owner: i64) -> Self {
        PollBuilder {
            owner,
            question: "What is your favourite colour?".to_string(),
            choices: Vec::new(),
        }
    }

    pub fn question(mut self, question: &str) -> Self {
        self.question = question.to_string();
        self
    }

    pub fn choice(mut self, text: &str) -> Self {
        self.choices.push(text.to_string());
        self
    }

    pub async fn create(self, pool: &DbPool) -> PollFixture {
        let poll_id = poll::create(pool, &self.question, "2024-01-01T00:00:00", self.owner)
            .await
            .expect("create poll");
        let created = poll::find_by_id(pool, poll_id)
            .await
            .expect("query poll")
            .expect("poll not found after create");

        let mut choices = Vec::with_capacity(self.choices.len());
        for text in &self.choices {
            let choice_id = choice::create(pool, poll_id, text).await.expect("create choice");
            let c = choice::find_by_id(pool, choice_id)
                .await
                .expect("query choice")
                .expect("choice not found after create");
            choices.push(c);
        }

        PollFixture {
            poll: created,
            choices,
        }
    }
}
