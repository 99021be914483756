//! The persistence seam `TodoStore` delegates to.

use std::sync::Arc;

use uuid::Uuid;

use crate::types::Todo;

/// Storage for todo records.
///
/// Implementations decide how records are stored, how ids are assigned on
/// first save, and what deleting an unknown id means. Lookups report a
/// missing record as `Ok(None)`; `Err` is reserved for storage failures.
pub trait TodoRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn find_all(&self) -> Result<Vec<Todo>, Self::Error>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, Self::Error>;

    /// Insert or replace `todo`, returning the stored representation with
    /// its id filled in.
    fn save(&self, todo: Todo) -> Result<Todo, Self::Error>;

    fn delete_by_id(&self, id: Uuid) -> Result<(), Self::Error>;

    fn exists_by_id(&self, id: Uuid) -> Result<bool, Self::Error>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    type Error = R::Error;

    fn find_all(&self) -> Result<Vec<Todo>, Self::Error> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, Self::Error> {
        (**self).find_by_id(id)
    }

    fn save(&self, todo: Todo) -> Result<Todo, Self::Error> {
        (**self).save(todo)
    }

    fn delete_by_id(&self, id: Uuid) -> Result<(), Self::Error> {
        (**self).delete_by_id(id)
    }

    fn exists_by_id(&self, id: Uuid) -> Result<bool, Self::Error> {
        (**self).exists_by_id(id)
    }
}

impl<R: TodoRepository + ?Sized> TodoRepository for Arc<R> {
    type Error = R::Error;

    fn find_all(&self) -> Result<Vec<Todo>, Self::Error> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, Self::Error> {
        (**self).find_by_id(id)
    }

    fn save(&self, todo: Todo) -> Result<Todo, Self::Error> {
        (**self).save(todo)
    }

    fn delete_by_id(&self, id: Uuid) -> Result<(), Self::Error> {
        (**self).delete_by_id(id)
    }

    fn exists_by_id(&self, id: Uuid) -> Result<bool, Self::Error> {
        (**self).exists_by_id(id)
    }
}
