//! Stateless façade over a `TodoRepository`.
//!
//! # Design
//! `TodoStore` holds only its repository and performs no retries, error
//! translation, or logging. The single rule it owns is the creation
//! timestamp default applied in `save`.

use chrono::Utc;
use uuid::Uuid;

use crate::repository::TodoRepository;
use crate::types::Todo;

/// Todo service delegating every operation to `R`.
#[derive(Debug, Clone)]
pub struct TodoStore<R> {
    repo: R,
}

impl<R: TodoRepository> TodoStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Every stored todo, in whatever order the repository yields them.
    pub fn find_all(&self) -> Result<Vec<Todo>, R::Error> {
        self.repo.find_all()
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, R::Error> {
        self.repo.find_by_id(id)
    }

    /// Save `todo`, stamping `created_at` with the current time if unset.
    ///
    /// The timestamp is written into the caller's record before the
    /// repository is called, so it sticks even when the save fails. An
    /// existing timestamp is never replaced.
    pub fn save(&self, todo: &mut Todo) -> Result<Todo, R::Error> {
        todo.created_at.get_or_insert_with(Utc::now);
        self.repo.save(todo.clone())
    }

    pub fn delete_by_id(&self, id: Uuid) -> Result<(), R::Error> {
        self.repo.delete_by_id(id)
    }

    pub fn exists_by_id(&self, id: Uuid) -> Result<bool, R::Error> {
        self.repo.exists_by_id(id)
    }
}
