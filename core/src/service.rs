//! Todo operations and store-error translation.
//!
//! # Design
//! Every store error is translated here, once, into a `TodoError`. The mapping
//! is per operation and matches on the `StoreError` tag only. Tags an
//! operation does not expect fall through to `TodoError::Unknown`; their detail
//! is logged and dropped.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{Result, StoreError, TodoError};
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, UpdateTodo};

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

fn unknown(operation: &str, err: StoreError) -> TodoError {
    error!(operation, error = %err, "unmapped store error");
    TodoError::Unknown
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Create a todo and return its new identifier.
    pub async fn create_todo(&self, input: CreateTodo) -> Result<Uuid> {
        match self.store.insert(input).await {
            Ok(todo) => {
                info!(id = %todo.id, "created todo");
                Ok(todo.id)
            }
            Err(StoreError::UniqueViolation { .. }) => Err(TodoError::DuplicateTitle),
            Err(err) => Err(unknown("create_todo", err)),
        }
    }

    pub async fn get_all_todo(&self) -> Result<Vec<Todo>> {
        self.store
            .find_all()
            .await
            .map_err(|err| unknown("get_all_todo", err))
    }

    pub async fn get_todo_by_id(&self, id: Uuid) -> Result<Todo> {
        match self.store.find_by_id_or_fail(id).await {
            Ok(todo) => Ok(todo),
            Err(StoreError::RecordNotFound) => Err(TodoError::NotFound),
            Err(err) => Err(unknown("get_todo_by_id", err)),
        }
    }

    /// Apply a partial update and return the record's identifier.
    pub async fn update_todo(&self, id: Uuid, update: UpdateTodo) -> Result<Uuid> {
        if update.is_empty() {
            debug!(%id, "update carries no fields, refreshing timestamp only");
        }
        match self.store.update_by_id(id, update).await {
            Ok(todo) => {
                info!(id = %todo.id, "updated todo");
                Ok(todo.id)
            }
            Err(StoreError::RecordNotFound) => Err(TodoError::NotFound),
            Err(StoreError::UniqueViolation { .. }) => Err(TodoError::DuplicateTitle),
            Err(err) => Err(unknown("update_todo", err)),
        }
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<()> {
        match self.store.delete_by_id(id).await {
            Ok(()) => {
                info!(%id, "deleted todo");
                Ok(())
            }
            Err(StoreError::RecordNotFound) => Err(TodoError::NotFound),
            Err(err) => Err(unknown("delete_todo", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    /// Store whose every call fails with the same error.
    struct FailingStore(StoreError);

    #[async_trait]
    impl TodoStore for FailingStore {
        async fn insert(&self, _: CreateTodo) -> std::result::Result<Todo, StoreError> {
            Err(self.0.clone())
        }
        async fn find_all(&self) -> std::result::Result<Vec<Todo>, StoreError> {
            Err(self.0.clone())
        }
        async fn find_by_id_or_fail(&self, _: Uuid) -> std::result::Result<Todo, StoreError> {
            Err(self.0.clone())
        }
        async fn update_by_id(
            &self,
            _: Uuid,
            _: UpdateTodo,
        ) -> std::result::Result<Todo, StoreError> {
            Err(self.0.clone())
        }
        async fn delete_by_id(&self, _: Uuid) -> std::result::Result<(), StoreError> {
            Err(self.0.clone())
        }
    }

    fn failing(err: StoreError) -> TodoService {
        TodoService::new(Arc::new(FailingStore(err)))
    }

    fn service() -> TodoService {
        TodoService::new(Arc::new(MemoryStore::new()))
    }

    fn create(title: &str) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
        }
    }

    fn duplicate() -> StoreError {
        StoreError::UniqueViolation {
            constraint: "todos.title".into(),
        }
    }

    #[tokio::test]
    async fn created_todo_starts_incomplete() {
        let service = service();
        let id = service.create_todo(create("Buy milk")).await.unwrap();
        let todo = service.get_todo_by_id(id).await.unwrap();
        assert_eq!(todo.id, id);
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn second_create_with_same_title_is_duplicate() {
        let service = service();
        service.create_todo(create("Buy milk")).await.unwrap();
        assert_eq!(
            service.create_todo(create("Buy milk")).await.unwrap_err(),
            TodoError::DuplicateTitle
        );
    }

    #[tokio::test]
    async fn completing_leaves_title_and_refreshes_updated_at() {
        let service = service();
        let id = service.create_todo(create("Buy milk")).await.unwrap();
        let before = service.get_todo_by_id(id).await.unwrap();

        let update = UpdateTodo {
            title: None,
            completed: Some(true),
        };
        assert_eq!(service.update_todo(id, update).await.unwrap(), id);

        let after = service.get_todo_by_id(id).await.unwrap();
        assert_eq!(after.title, "Buy milk");
        assert!(after.completed);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn deleted_todo_is_not_found() {
        let service = service();
        let id = service.create_todo(create("Buy milk")).await.unwrap();
        service.delete_todo(id).await.unwrap();
        assert_eq!(service.get_todo_by_id(id).await.unwrap_err(), TodoError::NotFound);
        assert_eq!(service.delete_todo(id).await.unwrap_err(), TodoError::NotFound);
    }

    #[tokio::test]
    async fn never_created_id_is_not_found() {
        let service = service();
        assert_eq!(
            service.get_todo_by_id(Uuid::new_v4()).await.unwrap_err(),
            TodoError::NotFound
        );
    }

    #[tokio::test]
    async fn create_maps_only_unique_violation() {
        assert_eq!(
            failing(duplicate()).create_todo(create("Buy milk")).await,
            Err(TodoError::DuplicateTitle)
        );
        assert_eq!(
            failing(StoreError::RecordNotFound)
                .create_todo(create("Buy milk"))
                .await,
            Err(TodoError::Unknown)
        );
    }

    #[tokio::test]
    async fn get_all_surfaces_store_failure_as_unknown() {
        assert_eq!(
            failing(StoreError::backend("database is locked"))
                .get_all_todo()
                .await,
            Err(TodoError::Unknown)
        );
    }

    #[tokio::test]
    async fn get_by_id_maps_only_not_found() {
        let id = Uuid::new_v4();
        assert_eq!(
            failing(StoreError::RecordNotFound).get_todo_by_id(id).await,
            Err(TodoError::NotFound)
        );
        assert_eq!(
            failing(duplicate()).get_todo_by_id(id).await,
            Err(TodoError::Unknown)
        );
    }

    #[tokio::test]
    async fn update_maps_not_found_duplicate_and_unknown() {
        let id = Uuid::new_v4();
        let update = UpdateTodo {
            title: Some("Test Update Todo".into()),
            completed: None,
        };
        assert_eq!(
            failing(StoreError::RecordNotFound)
                .update_todo(id, update.clone())
                .await,
            Err(TodoError::NotFound)
        );
        assert_eq!(
            failing(duplicate()).update_todo(id, update.clone()).await,
            Err(TodoError::DuplicateTitle)
        );
        assert_eq!(
            failing(StoreError::backend("disk I/O error"))
                .update_todo(id, update)
                .await,
            Err(TodoError::Unknown)
        );
    }

    #[tokio::test]
    async fn delete_maps_not_found_and_unknown() {
        let id = Uuid::new_v4();
        assert_eq!(
            failing(StoreError::RecordNotFound).delete_todo(id).await,
            Err(TodoError::NotFound)
        );
        assert_eq!(
            failing(duplicate()).delete_todo(id).await,
            Err(TodoError::Unknown)
        );
    }
}
