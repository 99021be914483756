//! Storage-agnostic service core for todo records.
//!
//! # Overview
//! `TodoStore` is a thin façade over a `TodoRepository`. It owns no data;
//! every operation is forwarded to the repository, with one local rule:
//! a record saved without a creation timestamp gets one before it reaches
//! storage.
//!
//! # Design
//! - The repository is passed in at construction, never looked up globally.
//! - `TodoRepository` carries its own error type so failures reach the
//!   caller exactly as the repository produced them.
//! - `InMemoryTodoRepository` is a complete repository backed by a map,
//!   suitable for tests and for embedding through the C ABI.

pub mod error;
pub mod memory;
pub mod repository;
pub mod store;
pub mod types;

pub use error::MemoryError;
pub use memory::InMemoryTodoRepository;
pub use repository::TodoRepository;
pub use store::TodoStore;
pub use types::Todo;
