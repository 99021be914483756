//! Error types for the bundled repositories.
//!
//! `TodoStore` defines no error of its own; it returns whatever its
//! repository returns. This module only covers `InMemoryTodoRepository`.

use thiserror::Error;

/// Errors returned by `InMemoryTodoRepository`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A thread panicked while holding the map lock.
    #[error("in-memory repository lock poisoned")]
    Poisoned,
}
