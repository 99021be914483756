//! C-ABI wrapper around `todo-core`.
//!
//! # Overview
//! Exposes a `TodoStore` backed by the in-memory repository through
//! `extern "C"` functions, so any language with a C FFI can list, look up,
//! save, delete, and check todo records.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One function per store operation, mirroring `TodoStore` 1:1.
//! - A single `FfiTodoResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_*_free` / `todo_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use todo_core::{InMemoryTodoRepository, TodoStore};
use tracing_subscriber::EnvFilter;

use types::*;

/// Environment variable holding the `tracing` filter for `todo_log_init`.
const LOG_ENV: &str = "TODO_LOG";

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr `tracing` subscriber filtered by `TODO_LOG`
/// (default `warn`). Later calls are no-ops.
#[unsafe(no_mangle)]
pub extern "C" fn todo_log_init() {
    let _ = catch_unwind(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Create a new, empty store.
///
/// Returns null if an internal panic occurs.
/// The caller must free the returned pointer with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_new() -> *mut FfiTodoStore {
    catch_unwind(|| {
        let store = TodoStore::new(InMemoryTodoRepository::new());
        Box::into_raw(Box::new(FfiTodoStore { inner: store }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `todo_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_free(store: *mut FfiTodoStore) {
    if !store.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(store) });
        });
    }
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

/// Turn a store-level outcome into a heap-allocated result envelope.
fn respond(outcome: Result<*mut FfiTodoResult, FfiFault>) -> *mut FfiTodoResult {
    outcome.unwrap_or_else(FfiTodoResult::from_fault)
}

/// List every stored todo.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_find_all(store: *const FfiTodoStore) -> *mut FfiTodoResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("store"));
        }
        let store = unsafe { &*store };
        respond(
            store
                .inner
                .find_all()
                .map_err(FfiFault::from)
                .and_then(FfiTodoResult::ok_todo_list),
        )
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_store_find_all"))
}

/// Look up a todo by its UUID string.
///
/// Returns `data_tag = Todo` when found and `data_tag = None` when not;
/// both have `error_code = Ok`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_find_by_id(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("store"));
        }
        if id.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("id"));
        }
        let store = unsafe { &*store };
        respond(unsafe { read_id(id) }.and_then(|id| {
            match store.inner.find_by_id(id)? {
                Some(todo) => FfiTodoResult::ok_todo(todo),
                None => Ok(FfiTodoResult::ok_empty()),
            }
        }))
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_store_find_by_id"))
}

/// Save a todo, defaulting its creation timestamp when unset.
///
/// The defaulted timestamp is written back into `input`
/// (`has_created_at`, `created_at_ns`) at full precision, so the input can
/// be saved again without altering the stored timestamp. Returns a result
/// with `data_tag = Todo` holding the stored record, including its id.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_save(
    store: *const FfiTodoStore,
    input: *mut FfiTodoInput,
) -> *mut FfiTodoResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("store"));
        }
        if input.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("input"));
        }
        let store = unsafe { &*store };
        let input = unsafe { &mut *input };
        respond(unsafe { input.to_core() }.and_then(|mut todo| {
            let outcome = store.inner.save(&mut todo);
            if let Some(created_at) = todo.created_at {
                input.created_at_ns = epoch_nanos(created_at)?;
                input.has_created_at = true;
            }
            FfiTodoResult::ok_todo(outcome?)
        }))
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_store_save"))
}

/// Delete a todo by its UUID string. Deleting an unknown id succeeds.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_delete_by_id(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("store"));
        }
        if id.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("id"));
        }
        let store = unsafe { &*store };
        respond(unsafe { read_id(id) }.and_then(|id| {
            store.inner.delete_by_id(id)?;
            Ok(FfiTodoResult::ok_empty())
        }))
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_store_delete_by_id"))
}

/// Check whether a todo with the given UUID string is stored.
///
/// Returns a result with `data_tag = Exists`; the answer is in `exists`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_exists_by_id(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("store"));
        }
        if id.is_null() {
            return FfiTodoResult::from_fault(FfiFault::null_arg("id"));
        }
        let store = unsafe { &*store };
        respond(unsafe { read_id(id) }.and_then(|id| {
            Ok(FfiTodoResult::ok_exists(store.inner.exists_by_id(id)?))
        }))
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_store_exists_by_id"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTodoResult` returned by any `todo_store_*` operation.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Todo => {
                    let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                    todo.free_fields();
                }
                FfiDataTag::TodoList => {
                    let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                    if !list.items.is_null() && list.len > 0 {
                        let items = unsafe {
                            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                                list.items,
                                list.len as usize,
                            ))
                        };
                        for item in items.iter() {
                            item.free_fields();
                        }
                    }
                }
                FfiDataTag::None | FfiDataTag::Exists => {}
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
