//! Domain core for the todo service.
//!
//! # Overview
//! Validation, data access and error translation for a single `Todo` entity.
//! Nothing here knows about HTTP; the server crate wires these pieces to axum
//! handlers and supplies the SQLite-backed store.
//!
//! # Design
//! - `validation` turns raw JSON bodies and path segments into typed inputs,
//!   or a list of field errors.
//! - `store::TodoStore` is the data-access seam. `MemoryStore` lives here so
//!   tests and the in-memory backend share one implementation.
//! - `TodoService` is the only place store errors become `TodoError`s.

pub mod error;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

pub use error::{StoreError, TodoError};
pub use service::TodoService;
pub use store::{MemoryStore, TodoStore};
pub use types::{CreateTodo, Todo, UpdateTodo};
pub use validation::{FieldError, ValidationErrors};
