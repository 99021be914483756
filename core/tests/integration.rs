//! Full lifecycle through `TodoStore` over the in-memory repository.
//!
//! # Design
//! Exercises every store operation against a shared
//! `Arc<InMemoryTodoRepository>` so the test can observe storage directly,
//! plus a failing repository to check that errors arrive unchanged.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use todo_core::{InMemoryTodoRepository, Todo, TodoRepository, TodoStore};
use uuid::Uuid;

#[test]
fn crud_lifecycle() {
    let repo = Arc::new(InMemoryTodoRepository::new());
    let store = TodoStore::new(repo.clone());

    // Step 1: nothing stored yet.
    assert!(store.find_all().unwrap().is_empty(), "expected empty list");

    // Step 2: save a new todo.
    let mut input = Todo::new("buy milk");
    let saved = store.save(&mut input).unwrap();
    let id = saved.id.expect("repository assigns an id");
    assert_eq!(saved.title, "buy milk");
    let created_at = saved.created_at.expect("timestamp defaulted");
    assert!(Utc::now() - created_at < Duration::seconds(5));

    // Step 3: it is visible both through the store and in the repository.
    assert_eq!(store.find_by_id(id).unwrap(), Some(saved.clone()));
    assert!(repo.exists_by_id(id).unwrap());

    // Step 4: update and re-save; the timestamp stays put.
    let mut update = saved.clone();
    update.completed = true;
    update.description = Some("two litres".to_string());
    let updated = store.save(&mut update).unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.created_at, Some(created_at));
    assert_eq!(repo.len().unwrap(), 1);

    // Step 5: delete.
    store.delete_by_id(id).unwrap();
    assert!(!store.exists_by_id(id).unwrap());
    assert_eq!(store.find_by_id(id).unwrap(), None);

    // Step 6: deleting again is still fine.
    store.delete_by_id(id).unwrap();
    assert!(store.find_all().unwrap().is_empty(), "expected empty list after delete");
}

#[test]
fn find_all_returns_exactly_the_stored_set() {
    let seeded = InMemoryTodoRepository::with_todos([
        Todo::new("one"),
        Todo::new("two"),
        Todo::new("three").completed(true),
    ]);
    let store = TodoStore::new(seeded);

    let titles: HashSet<String> = store.find_all().unwrap().into_iter().map(|t| t.title).collect();
    let expected: HashSet<String> = ["one", "two", "three"].iter().map(|s| s.to_string()).collect();
    assert_eq!(titles, expected);
}

#[test]
fn seeded_records_without_timestamp_are_returned_as_stored() {
    let store = TodoStore::new(InMemoryTodoRepository::with_todos([Todo::new("legacy")]));
    let todos = store.find_all().unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos[0].created_at.is_none(), "reads never stamp records");
}

#[test]
fn concurrent_saves_through_shared_store() {
    let store = Arc::new(TodoStore::new(Arc::new(InMemoryTodoRepository::new())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let mut todo = Todo::new(format!("task {i}"));
                store.save(&mut todo).unwrap().id.unwrap()
            })
        })
        .collect();

    let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(store.find_all().unwrap().len(), 8);
    for id in ids {
        assert!(store.exists_by_id(id).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Error propagation
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("connection lost")]
struct ConnectionLost;

struct OfflineRepository;

impl TodoRepository for OfflineRepository {
    type Error = ConnectionLost;

    fn find_all(&self) -> Result<Vec<Todo>, ConnectionLost> {
        Err(ConnectionLost)
    }

    fn find_by_id(&self, _id: Uuid) -> Result<Option<Todo>, ConnectionLost> {
        Err(ConnectionLost)
    }

    fn save(&self, _todo: Todo) -> Result<Todo, ConnectionLost> {
        Err(ConnectionLost)
    }

    fn delete_by_id(&self, _id: Uuid) -> Result<(), ConnectionLost> {
        Err(ConnectionLost)
    }

    fn exists_by_id(&self, _id: Uuid) -> Result<bool, ConnectionLost> {
        Err(ConnectionLost)
    }
}

#[test]
fn repository_errors_pass_through_unchanged() {
    let store = TodoStore::new(OfflineRepository);
    let id = Uuid::new_v4();

    assert_eq!(store.find_all().unwrap_err(), ConnectionLost);
    assert_eq!(store.find_by_id(id).unwrap_err(), ConnectionLost);
    assert_eq!(store.delete_by_id(id).unwrap_err(), ConnectionLost);
    assert_eq!(store.exists_by_id(id).unwrap_err(), ConnectionLost);

    let mut todo = Todo::new("Test");
    assert_eq!(store.save(&mut todo).unwrap_err(), ConnectionLost);
    assert!(todo.created_at.is_some(), "timestamp is applied before delegating");
}
