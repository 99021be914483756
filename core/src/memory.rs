//! Map-backed `TodoRepository`.
//!
//! # Design
//! Records live in a `HashMap<Uuid, Todo>` behind a `std::sync::RwLock`, so
//! reads run in parallel and writes are serialized. `save` is an upsert
//! and `delete_by_id` ignores unknown ids; concurrent writes to the same id
//! resolve as last-writer-wins.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::MemoryError;
use crate::repository::TodoRepository;
use crate::types::Todo;

#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository. Records without an id are given a fresh one.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let todos = todos
            .into_iter()
            .map(|mut todo| {
                let id = *todo.id.get_or_insert_with(Uuid::new_v4);
                (id, todo)
            })
            .collect();
        Self {
            todos: RwLock::new(todos),
        }
    }

    pub fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MemoryError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Todo>>, MemoryError> {
        self.todos.read().map_err(|_| MemoryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Todo>>, MemoryError> {
        self.todos.write().map_err(|_| MemoryError::Poisoned)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    type Error = MemoryError;

    fn find_all(&self) -> Result<Vec<Todo>, MemoryError> {
        let todos = self.read()?;
        trace!(count = todos.len(), "listing todos");
        Ok(todos.values().cloned().collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, MemoryError> {
        trace!(%id, "looking up todo");
        Ok(self.read()?.get(&id).cloned())
    }

    fn save(&self, mut todo: Todo) -> Result<Todo, MemoryError> {
        let id = *todo.id.get_or_insert_with(Uuid::new_v4);
        let replaced = self.write()?.insert(id, todo.clone()).is_some();
        debug!(%id, replaced, "saved todo");
        Ok(todo)
    }

    fn delete_by_id(&self, id: Uuid) -> Result<(), MemoryError> {
        let removed = self.write()?.remove(&id).is_some();
        debug!(%id, removed, "deleted todo");
        Ok(())
    }

    fn exists_by_id(&self, id: Uuid) -> Result<bool, MemoryError> {
        Ok(self.read()?.contains_key(&id))
    }
}
