//! # Lingo Review Core
//!
//! Spaced-repetition review scheduling and daily streak tracking for a
//! language-learning app, stored in LMDB and exposed to the host UI over a
//! C-compatible interface.
//!
//! ## Features
//!
//! - **Review scheduling**: words move up one level per successful review
//!   and come back after 1, 3, 7, 14, 30, then 90 days
//! - **Identity merge**: a word seen again (by id or case-insensitive text)
//!   updates the existing entry instead of duplicating it
//! - **Streaks**: consecutive-day session counter, counted at most once a day
//! - **Fail-open storage**: unreadable stored data opens as empty state
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lingo_review_core::{CoreConfig, CoreEvent, FixedClock, MemoryStore, ReviewCore};
//!
//! let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! let mut core = ReviewCore::new(MemoryStore::new(), &clock, &CoreConfig::default());
//!
//! core.handle(CoreEvent::VocabularyObserved {
//!     word: "Bonjour".into(),
//!     translation: "Hello".into(),
//! })?;
//! assert_eq!(core.due_today().len(), 1);
//! # Ok::<(), lingo_review_core::AppResponse>(())
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_review_core`] - Open a core on `<name>.lmdb` with default settings
//! - [`create_review_core_with_config`] - Open a core from a JSON [`CoreConfig`]
//! - [`dispatch_event`] - Apply a [`CoreEvent`] and return its outcome
//! - [`get_due_words`] - Words due on a date (or today)
//! - [`get_displayed_streak`] - Streak to show right now
//! - [`close_review_core`] - Release the handle and close the environment
//! - [`free_response`] - Release a string returned by any of the above

pub mod app_response;
pub mod clock;
pub mod config;
pub mod kv_store;
pub mod local_db_state;
pub mod review_core;
pub mod review_model;
pub mod review_store;
pub mod scheduler;
pub mod session;
pub mod streak;

pub use crate::app_response::AppResponse;
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::CoreConfig;
pub use crate::kv_store::{KeyValueStore, MemoryStore};
pub use crate::review_core::{CoreEvent, EventOutcome, ReviewCore};
pub use crate::review_model::{ReviewWord, WordDetails};
pub use crate::scheduler::{UpsertOutcome, INTERVAL_TABLE};
pub use crate::session::{SessionKind, SessionSummary};

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Mutex;

use chrono::NaiveDate;
use log::{info, warn};

use crate::local_db_state::AppDbState;

/// Opaque handle given to the host. The mutex serializes calls made from
/// different host threads.
pub struct CoreHandle {
    core: Mutex<ReviewCore<AppDbState, SystemClock>>,
}

/// Opens a review core backed by `<name>.lmdb`, all other settings default.
///
/// The environment directory is created when missing. Stored review words
/// and streak data are loaded immediately; unreadable records open empty.
///
/// # Parameters
///
/// * `name` - Null-terminated UTF-8 base path of the database
///
/// # Returns
///
/// A handle for the other functions, or null if `name` is null, not UTF-8,
/// or the environment cannot be opened. Release it with [`close_review_core`].
///
/// # Safety
///
/// `name` must be null or point to a valid null-terminated string.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use lingo_review_core::create_review_core;
///
/// let name = CString::new("learner").unwrap();
/// let handle = create_review_core(name.as_ptr());
/// assert!(!handle.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_review_core(name: *const c_char) -> *mut CoreHandle {
    if name.is_null() {
        warn!("Null name pointer passed to create_review_core");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_handle(CoreConfig::with_path(name_str))
}

/// Opens a review core from a JSON [`CoreConfig`].
///
/// # Parameters
///
/// * `config_json` - Null-terminated JSON object; omitted fields take their
///   defaults, e.g. `{"dbPath":"learner","dailyGoal":150}`
///
/// # Returns
///
/// A handle, or null if the pointer is null, the JSON is malformed, the
/// config fails validation (empty path or keys, equal keys, zero map
/// size) or the environment cannot be opened.
///
/// # Safety
///
/// `config_json` must be null or point to a valid null-terminated string.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_review_core_with_config(config_json: *const c_char) -> *mut CoreHandle {
    if config_json.is_null() {
        warn!("Null config pointer passed to create_review_core_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match CoreConfig::from_json(json) {
        Ok(config) => open_handle(config),
        Err(e) => {
            warn!("Rejected review core config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_handle(config: CoreConfig) -> *mut CoreHandle {
    match ReviewCore::open(&config) {
        Ok(core) => {
            info!("Review core initialized from {}", config.lmdb_dir());
            Box::into_raw(Box::new(CoreHandle {
                core: Mutex::new(core),
            }))
        }
        Err(e) => {
            warn!("Failed to open review core at {}: {e}", config.lmdb_dir());
            std::ptr::null_mut()
        }
    }
}

/// Applies one event from the host and persists the result.
///
/// # Parameters
///
/// * `handle` - Handle from [`create_review_core`]
/// * `event_json` - Null-terminated JSON event (see below)
///
/// # Returns
///
/// A serialized [`AppResponse`] to release with [`free_response`]. On
/// success it is `Ok` carrying the outcome JSON: `{"outcome":"created","id":…}`,
/// `{"outcome":"updated","id":…}` or `{"outcome":"ignored"}` for word
/// events, a [`SessionSummary`] for `sessionCompleted`. Malformed events
/// give `SerializationError`; failed writes give `DatabaseError`.
///
/// # Safety
///
/// `handle` must be null or a live handle; `event_json` must be null or a
/// valid null-terminated string.
///
/// # JSON Format
///
/// ```json
/// {"type": "vocabularyObserved", "word": "Bonjour", "translation": "Hello"}
/// {"type": "wordMarkedLearned", "id": "…", "currentLevel": 2}
/// {"type": "wordAdded", "id": "1718", "word": "Chat", "translation": "Cat"}
/// {"type": "sessionCompleted", "kind": "chat"}
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn dispatch_event(handle: *mut CoreHandle, event_json: *const c_char) -> *const c_char {
    let json_str = match c_ptr_to_string(event_json, "event") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let event: CoreEvent = match serde_json::from_str(&json_str) {
        Ok(e) => e,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid event JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    with_core(handle, "dispatch_event", |core| match core.handle(event) {
        Ok(outcome) => to_ok_response(&outcome),
        Err(e) => e,
    })
}

/// Lists the words due for review.
///
/// # Parameters
///
/// * `handle` - Handle from [`create_review_core`]
/// * `as_of` - Null-terminated `YYYY-MM-DD` date, or null for today
///
/// # Returns
///
/// `Ok` carrying a JSON array of [`ReviewWord`] whose review date is on or
/// before the date, in stored order. `BadRequest` for a null handle or an
/// unparseable date.
///
/// # Safety
///
/// `handle` must be null or a live handle; `as_of` must be null or a
/// valid null-terminated string.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_due_words(handle: *mut CoreHandle, as_of: *const c_char) -> *const c_char {
    let as_of = if as_of.is_null() {
        None
    } else {
        let date_str = match c_ptr_to_string(as_of, "date") {
            Ok(s) => s,
            Err(err) => return err,
        };
        match date_str.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(e) => {
                let error = AppResponse::BadRequest(format!("Invalid date '{date_str}': {e}"));
                return response_to_c_string(&error);
            }
        }
    };

    with_core(handle, "get_due_words", |core| {
        let words = match as_of {
            Some(date) => core.due_words(date),
            None => core.due_today(),
        };
        to_ok_response(&words)
    })
}

/// Returns the streak to show right now.
///
/// This is the stored count while the last completion was today or
/// yesterday, and 0 otherwise. Reading never modifies the stored streak.
///
/// # Parameters
///
/// * `handle` - Handle from [`create_review_core`]
///
/// # Returns
///
/// `Ok` carrying the count as a decimal string, e.g. `{"Ok":"3"}`, or
/// `BadRequest` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live handle.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_displayed_streak(handle: *mut CoreHandle) -> *const c_char {
    with_core(handle, "get_displayed_streak", |core| {
        AppResponse::Ok(core.displayed_streak().to_string())
    })
}

/// Closes the core and frees its handle.
///
/// The LMDB environment is synced to disk before it is closed.
///
/// # Parameters
///
/// * `handle` - Handle from [`create_review_core`]
///
/// # Returns
///
/// `Ok` once closed, `BadRequest` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live handle. It must not be used, or closed
/// again, afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_review_core(handle: *mut CoreHandle) -> *const c_char {
    if handle.is_null() {
        let error = AppResponse::BadRequest("Null handle passed to close_review_core".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(handle) });
    response_to_c_string(&AppResponse::success("Review core closed"))
}

/// Releases a response string returned by this library.
///
/// # Parameters
///
/// * `ptr` - A pointer returned by one of the functions above; null is ignored
///
/// # Safety
///
/// Each pointer must be freed exactly once and never read afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

fn with_core<F>(handle: *mut CoreHandle, op: &str, f: F) -> *const c_char
where
    F: FnOnce(&mut ReviewCore<AppDbState, SystemClock>) -> AppResponse,
{
    let handle = match unsafe { handle.as_ref() } {
        Some(h) => h,
        None => {
            let error = AppResponse::BadRequest(format!("Null handle passed to {op}"));
            return response_to_c_string(&error);
        }
    };

    let response = match handle.core.lock() {
        Ok(mut core) => f(&mut core),
        Err(_) => AppResponse::DatabaseError(format!("Review core lock poisoned in {op}")),
    };
    response_to_c_string(&response)
}

fn to_ok_response<T: serde::Serialize + ?Sized>(value: &T) -> AppResponse {
    match serde_json::to_string(value) {
        Ok(json) => AppResponse::Ok(json),
        Err(e) => AppResponse::SerializationError(format!("Failed to serialize result: {e}")),
    }
}

/// Serializes `response` into a heap C string owned by the caller
/// (release with [`free_response`]). Null if serialization fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Reads a C string argument, turning null or non-UTF-8 input into a
/// ready-made `BadRequest` response.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
