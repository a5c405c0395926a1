//! SQLite-backed `TodoStore`.
//!
//! # Design
//! Each trait method is one statement. Writes use `RETURNING` so the record
//! handed back is what the database stored. Driver errors are decoded by
//! `ErrorKind` and SQLite result code, never by message text.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use todo_core::store::TITLE_CONSTRAINT;
use todo_core::{CreateTodo, StoreError, Todo, TodoStore, UpdateTodo};

const COLUMNS: &str = "id, title, completed, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TodoRow {
    id: String,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = StoreError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StoreError::backend(format!("stored id {:?} is not a UUID: {e}", row.id)))?;
        Ok(Todo {
            id,
            title: row.title,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Translate a driver error into the store's tagged error.
fn decode_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::RecordNotFound,
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => StoreError::UniqueViolation {
                constraint: db_err
                    .constraint()
                    .unwrap_or(TITLE_CONSTRAINT)
                    .to_string(),
            },
            _ => StoreError::Backend {
                code: db_err.code().map(|code| code.into_owned()),
                message: db_err.message().to_string(),
            },
        },
        other => StoreError::backend(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and run migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        debug!(url, max_connections, "connected to sqlite");
        Self::from_pool(pool).await
    }

    /// Private in-memory database. Pinned to one connection that never
    /// expires, since every SQLite connection to `:memory:` is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO todos (id, title, created_at, updated_at) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let row: TodoRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.title)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(decode_error)?;
        row.try_into()
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM todos ORDER BY rowid");
        let rows: Vec<TodoRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(decode_error)?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn find_by_id_or_fail(&self, id: Uuid) -> Result<Todo, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM todos WHERE id = ?");
        let row: TodoRow = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(decode_error)?;
        row.try_into()
    }

    async fn update_by_id(&self, id: Uuid, update: UpdateTodo) -> Result<Todo, StoreError> {
        let sql = format!(
            "UPDATE todos SET title = COALESCE(?, title), completed = COALESCE(?, completed), \
             updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        let row: TodoRow = sqlx::query_as(&sql)
            .bind(update.title)
            .bind(update.completed)
            .bind(Utc::now())
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(decode_error)?;
        row.try_into()
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(decode_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }
        Ok(())
    }
}
