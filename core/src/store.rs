//! Data access for the `todos` table.
//!
//! # Design
//! `TodoStore` is a thin pass-through over a record store: it assigns ids and
//! timestamps, enforces nothing the backend does not, and reports failures as
//! `StoreError` without deciding what they mean to a caller. The service is
//! handed an `Arc<dyn TodoStore>`, so the SQLite store used in production and
//! `MemoryStore` are interchangeable.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Name reported in `StoreError::UniqueViolation` for the title constraint.
pub const TITLE_CONSTRAINT: &str = "todos.title";

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, input: CreateTodo) -> Result<Todo, StoreError>;

    /// All records in insertion order.
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id_or_fail(&self, id: Uuid) -> Result<Todo, StoreError>;

    async fn update_by_id(&self, id: Uuid, update: UpdateTodo) -> Result<Todo, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-process store backed by a `Vec` under a `tokio` lock.
///
/// Title uniqueness is checked and the write applied while holding the write
/// lock, which gives the same atomicity a `UNIQUE` index gives in SQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn title_taken(todos: &[Todo], title: &str, except: Option<Uuid>) -> bool {
    todos
        .iter()
        .any(|todo| todo.title == title && Some(todo.id) != except)
}

fn unique_violation() -> StoreError {
    StoreError::UniqueViolation {
        constraint: TITLE_CONSTRAINT.to_string(),
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        if title_taken(&todos, &input.title, None) {
            return Err(unique_violation());
        }
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: input.title,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id_or_fail(&self, id: Uuid) -> Result<Todo, StoreError> {
        let todos = self.todos.read().await;
        todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or(StoreError::RecordNotFound)
    }

    async fn update_by_id(&self, id: Uuid, update: UpdateTodo) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(StoreError::RecordNotFound)?;
        if let Some(title) = &update.title {
            if title_taken(&todos, title, Some(id)) {
                return Err(unique_violation());
            }
        }
        let todo = &mut todos[index];
        update.apply_to(todo, Utc::now());
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(StoreError::RecordNotFound)?;
        todos.remove(index);
        Ok(())
    }
}
