//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type in C-compatible form: `*mut c_char` for
//! strings, raw pointer plus length for lists, epoch nanoseconds plus a
//! presence flag for timestamps. Conversions live here so `lib.rs` stays
//! focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use chrono::{DateTime, Utc};
use todo_core::{InMemoryTodoRepository, MemoryError, Todo, TodoStore};
use uuid::Uuid;

/// Opaque handle to a `TodoStore` over an in-memory repository. C callers
/// receive a pointer to this and pass it back into every FFI function.
pub struct FfiTodoStore {
    pub(crate) inner: TodoStore<InMemoryTodoRepository>,
}

// ---------------------------------------------------------------------------
// Input (caller-owned, never freed by us)
// ---------------------------------------------------------------------------

/// A todo record supplied by the C caller.
///
/// `id` and `description` may be null. `created_at_ns` (Unix epoch
/// nanoseconds) is only read when `has_created_at` is true.
/// `todo_store_save` writes the defaulted timestamp back into these two
/// fields.
#[repr(C)]
pub struct FfiTodoInput {
    pub id: *const c_char,
    pub title: *const c_char,
    pub description: *const c_char,
    pub completed: bool,
    pub has_created_at: bool,
    pub created_at_ns: i64,
}

impl FfiTodoInput {
    /// Read the caller's fields into a core `Todo`.
    ///
    /// # Safety
    /// Every non-null pointer must reference a valid NUL-terminated string.
    pub(crate) unsafe fn to_core(&self) -> Result<Todo, FfiFault> {
        if self.title.is_null() {
            return Err(FfiFault::null_arg("title"));
        }
        let title = unsafe { read_str(self.title) }?;
        let id = if self.id.is_null() {
            None
        } else {
            Some(unsafe { read_id(self.id) }?)
        };
        let description = if self.description.is_null() {
            None
        } else {
            Some(unsafe { read_str(self.description) }?)
        };
        let created_at = self
            .has_created_at
            .then(|| DateTime::from_timestamp_nanos(self.created_at_ns));

        Ok(Todo {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            completed: self.completed,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTodoResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Repository = 1,
    InvalidId = 2,
    InvalidUtf8 = 3,
    InvalidTimestamp = 4,
    Panic = 5,
    NullArg = 6,
}

/// A rejected call, before it is turned into an `FfiTodoResult`.
#[derive(Debug)]
pub struct FfiFault {
    pub(crate) code: FfiErrorCode,
    pub(crate) message: String,
}

impl FfiFault {
    pub(crate) fn null_arg(name: &str) -> Self {
        Self {
            code: FfiErrorCode::NullArg,
            message: format!("null argument: {name}"),
        }
    }
}

impl From<MemoryError> for FfiFault {
    fn from(err: MemoryError) -> Self {
        Self {
            code: FfiErrorCode::Repository,
            message: err.to_string(),
        }
    }
}

/// Borrow a C string as `&str`.
///
/// # Safety
/// `ptr` must be non-null and reference a valid NUL-terminated string.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiFault> {
    unsafe { CStr::from_ptr(ptr) }.to_str().map_err(|e| FfiFault {
        code: FfiErrorCode::InvalidUtf8,
        message: format!("invalid UTF-8: {e}"),
    })
}

/// Parse a C string holding a UUID.
///
/// # Safety
/// Same contract as [`read_str`].
pub(crate) unsafe fn read_id(ptr: *const c_char) -> Result<Uuid, FfiFault> {
    let raw = unsafe { read_str(ptr) }?;
    Uuid::parse_str(raw).map_err(|e| FfiFault {
        code: FfiErrorCode::InvalidId,
        message: format!("invalid id {raw:?}: {e}"),
    })
}

/// Nanoseconds since the Unix epoch; representable for years 1677 to 2262.
pub(crate) fn epoch_nanos(ts: DateTime<Utc>) -> Result<i64, FfiFault> {
    ts.timestamp_nanos_opt().ok_or_else(|| FfiFault {
        code: FfiErrorCode::InvalidTimestamp,
        message: format!("timestamp out of range: {ts}"),
    })
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Output (allocated by us, freed through todo_free_result)
// ---------------------------------------------------------------------------

/// Tag that tells `todo_free_result` what `FfiTodoResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Todo = 1,
    TodoList = 2,
    Exists = 3,
}

/// A single todo record exposed to C. `id` is null only for records that
/// were never saved; `description` is null when absent.
#[repr(C)]
pub struct FfiTodo {
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub completed: bool,
    pub has_created_at: bool,
    pub created_at_ns: i64,
}

impl TryFrom<Todo> for FfiTodo {
    type Error = FfiFault;

    /// Fails only when `created_at` lies outside the nanosecond range; no C
    /// string is allocated in that case.
    fn try_from(todo: Todo) -> Result<Self, FfiFault> {
        let created_at_ns = todo.created_at.map(epoch_nanos).transpose()?;
        Ok(Self {
            id: todo
                .id
                .map_or(std::ptr::null_mut(), |id| into_c_string(id.to_string())),
            title: into_c_string(todo.title),
            description: todo
                .description
                .map_or(std::ptr::null_mut(), into_c_string),
            completed: todo.completed,
            has_created_at: created_at_ns.is_some(),
            created_at_ns: created_at_ns.unwrap_or(0),
        })
    }
}

impl FfiTodo {
    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        for ptr in [self.id, self.title, self.description] {
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    }
}

/// `FfiTodoList::len` for a list of `len` records.
pub(crate) fn list_len(len: usize) -> Result<u32, FfiFault> {
    u32::try_from(len).map_err(|_| FfiFault {
        code: FfiErrorCode::Repository,
        message: format!("{len} todos exceed the C list limit of {}", u32::MAX),
    })
}

/// A list of todo records exposed to C.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for every store operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. `exists` is only meaningful
/// when `data_tag` is `Exists`. A lookup that finds nothing succeeds with
/// `data_tag = None`.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
    pub exists: bool,
}

impl FfiTodoResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void, exists: bool) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            data_tag,
            data,
            exists,
        }))
    }

    /// Build a success result carrying a single `FfiTodo`.
    pub(crate) fn ok_todo(todo: Todo) -> Result<*mut Self, FfiFault> {
        let ffi_todo = Box::new(FfiTodo::try_from(todo)?);
        Ok(Self::ok(FfiDataTag::Todo, Box::into_raw(ffi_todo) as *mut std::ffi::c_void, false))
    }

    /// Build a success result carrying a `FfiTodoList`.
    pub(crate) fn ok_todo_list(todos: Vec<Todo>) -> Result<*mut Self, FfiFault> {
        let len = list_len(todos.len())?;
        let mut converted = Vec::with_capacity(todos.len());
        for todo in todos {
            match FfiTodo::try_from(todo) {
                Ok(ffi_todo) => converted.push(ffi_todo),
                Err(fault) => {
                    converted.iter().for_each(FfiTodo::free_fields);
                    return Err(fault);
                }
            }
        }
        // Boxed slice so capacity == len when the list is rebuilt for freeing.
        let ffi_todos = converted.into_boxed_slice();
        let items = if ffi_todos.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(ffi_todos) as *mut FfiTodo
        };

        let ffi_list = Box::new(FfiTodoList { items, len });
        Ok(Self::ok(FfiDataTag::TodoList, Box::into_raw(ffi_list) as *mut std::ffi::c_void, false))
    }

    /// Build a success result with no payload (delete, or a lookup miss).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut(), false)
    }

    pub(crate) fn ok_exists(exists: bool) -> *mut Self {
        Self::ok(FfiDataTag::Exists, std::ptr::null_mut(), exists)
    }

    pub(crate) fn from_fault(fault: FfiFault) -> *mut Self {
        tracing::warn!(code = ?fault.code, message = %fault.message, "todo ffi call rejected");
        Box::into_raw(Box::new(FfiTodoResult {
            error_code: fault.code,
            error_message: into_c_string(fault.message),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
            exists: false,
        }))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::from_fault(FfiFault {
            code: FfiErrorCode::Panic,
            message: msg.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn todo_beyond_nanosecond_range_is_rejected() {
        let mut todo = Todo::new("far future");
        todo.created_at = Some(Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap());
        let fault = FfiTodo::try_from(todo).err().expect("out of range");
        assert_eq!(fault.code, FfiErrorCode::InvalidTimestamp);
    }

    #[test]
    fn todo_list_with_bad_timestamp_fails_whole_result() {
        let mut late = Todo::new("late");
        late.created_at = Some(Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap());
        let fault = FfiTodoResult::ok_todo_list(vec![Todo::new("fine"), late])
            .err()
            .expect("out of range");
        assert_eq!(fault.code, FfiErrorCode::InvalidTimestamp);
    }

    #[test]
    fn memory_error_maps_to_repository_code() {
        let fault = FfiFault::from(MemoryError::Poisoned);
        assert_eq!(fault.code, FfiErrorCode::Repository);

        let result = FfiTodoResult::from_fault(fault);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Repository);
        let message = unsafe { CStr::from_ptr(r.error_message) }.to_str().unwrap();
        assert_eq!(message, "in-memory repository lock poisoned");
        crate::todo_free_result(result);
    }

    #[test]
    fn list_len_fits_u32() {
        assert_eq!(list_len(0).unwrap(), 0);
        assert_eq!(list_len(u32::MAX as usize).unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn list_len_overflow_is_a_fault() {
        let fault = list_len(u32::MAX as usize + 1).unwrap_err();
        assert_eq!(fault.code, FfiErrorCode::Repository);
    }
}
