//! C FFI bindings for csvcf-core
//!
//! This crate provides a C-compatible API so a native UI can drive the
//! editor session and batch conversion. Strings returned by accessor
//! functions are owned by the caller and must be released with
//! `csvcf_free_string`.

use csvcf_core::{convert, ConvertOptions, Direction, NamingSequence, SessionState, TableView};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;

/// `direction` value for CSV to vCard
pub const CSVCF_TO_VCARD: c_int = 0;
/// `direction` value for vCard to CSV
pub const CSVCF_TO_CSV: c_int = 1;

/// Opaque handle to an editor session
pub struct CsvcfSession {
    inner: SessionState,
    view: TableView,
    last_error: Option<CString>,
}

impl CsvcfSession {
    fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into().replace('\0', " ");
        self.last_error = CString::new(message).ok();
    }

    fn refresh_view(&mut self) {
        self.view = self.inner.view();
    }
}

/// Read `count` C strings into paths, skipping nulls and invalid UTF-8
unsafe fn read_paths(paths: *const *const c_char, count: usize) -> Vec<PathBuf> {
    if paths.is_null() {
        return Vec::new();
    }

    (0..count)
        .filter_map(|i| {
            let ptr = *paths.add(i);
            if ptr.is_null() {
                None
            } else {
                CStr::from_ptr(ptr).to_str().ok().map(PathBuf::from)
            }
        })
        .collect()
}

unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        CStr::from_ptr(s).to_str().ok()
    }
}

fn into_c_string(s: &str) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Create an empty session
#[no_mangle]
pub extern "C" fn csvcf_session_new() -> *mut CsvcfSession {
    Box::into_raw(Box::new(CsvcfSession {
        inner: SessionState::new(),
        view: TableView::default(),
        last_error: None,
    }))
}

/// Free a session
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn csvcf_session_free(session: *mut CsvcfSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Load CSV files into the session, replacing its contents
///
/// Returns the number of files loaded, or -1 on error. Files that fail to
/// load are described by `csvcf_session_last_error`.
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - `paths` must point to `count` C strings
#[no_mangle]
pub unsafe extern "C" fn csvcf_session_load(
    session: *mut CsvcfSession,
    paths: *const *const c_char,
    count: usize,
) -> isize {
    let Some(session) = session.as_mut() else {
        return -1;
    };
    session.last_error = None;

    let paths = read_paths(paths, count);
    match session.inner.load(&paths) {
        Ok(report) => {
            if !report.failures.is_empty() {
                let messages: Vec<String> =
                    report.failures.iter().map(|(_, e)| e.to_string()).collect();
                session.set_error(messages.join("\n"));
            }
            session.refresh_view();
            (paths.len() - report.failures.len()) as isize
        }
        Err(e) => {
            session.set_error(e.to_string());
            -1
        }
    }
}

/// Rename the first column of every loaded record
///
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - `prefix` and `start_index` must be valid C strings
#[no_mangle]
pub unsafe extern "C" fn csvcf_session_rename(
    session: *mut CsvcfSession,
    prefix: *const c_char,
    start_index: *const c_char,
) -> c_int {
    let Some(session) = session.as_mut() else {
        return -1;
    };

    let (Some(prefix), Some(start)) = (read_str(prefix), read_str(start_index)) else {
        session.set_error("prefix and starting index are required");
        return -1;
    };

    let result = NamingSequence::parse(prefix, start).and_then(|seq| session.inner.rename(&seq));
    match result {
        Ok(()) => {
            session.last_error = None;
            session.refresh_view();
            0
        }
        Err(e) => {
            session.set_error(e.to_string());
            -1
        }
    }
}

/// Concatenate the loaded datasets and save them as one CSV file
///
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - `path` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn csvcf_session_save_merged(
    session: *mut CsvcfSession,
    path: *const c_char,
) -> c_int {
    let Some(session) = session.as_mut() else {
        return -1;
    };
    let Some(path) = read_str(path) else {
        session.set_error("output path is required");
        return -1;
    };

    match session.inner.save_merged(path) {
        Ok(_) => {
            session.last_error = None;
            0
        }
        Err(e) => {
            session.set_error(e.to_string());
            -1
        }
    }
}

/// Convert files into `output_dir`, continuing past failures
///
/// Returns the number of files converted, or -1 if the batch could not
/// start. Per-file failures are described by `csvcf_session_last_error`.
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - `paths` must point to `count` C strings
/// - `output_dir` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn csvcf_convert(
    session: *mut CsvcfSession,
    paths: *const *const c_char,
    count: usize,
    direction: c_int,
    output_dir: *const c_char,
) -> isize {
    let Some(session) = session.as_mut() else {
        return -1;
    };

    let direction = match direction {
        CSVCF_TO_VCARD => Direction::ToVcard,
        CSVCF_TO_CSV => Direction::ToTabular,
        other => {
            session.set_error(format!("unknown direction {}", other));
            return -1;
        }
    };
    let output_dir = PathBuf::from(read_str(output_dir).unwrap_or_default());
    let paths = read_paths(paths, count);

    match convert(&paths, direction, &output_dir, ConvertOptions::default()) {
        Ok(report) => {
            session.last_error = None;
            let failures: Vec<String> = report
                .outcomes
                .iter()
                .filter_map(|o| match o {
                    csvcf_core::FileOutcome::Failed { message, .. } => Some(message.clone()),
                    csvcf_core::FileOutcome::Converted { .. } => None,
                })
                .collect();
            if !failures.is_empty() {
                session.set_error(failures.join("\n"));
            }
            report.converted_files().len() as isize
        }
        Err(e) => {
            session.set_error(e.to_string());
            -1
        }
    }
}

/// Last error message, or null if the previous call succeeded
///
/// The pointer stays valid until the next call on this session; do not free it.
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
#[no_mangle]
pub unsafe extern "C" fn csvcf_session_last_error(session: *const CsvcfSession) -> *const c_char {
    session
        .as_ref()
        .and_then(|s| s.last_error.as_ref())
        .map(|e| e.as_ptr())
        .unwrap_or(ptr::null())
}

/// Get the number of rows in the session view
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
#[no_mangle]
pub unsafe extern "C" fn csvcf_view_row_count(session: *const CsvcfSession) -> usize {
    session.as_ref().map(|s| s.view.row_count()).unwrap_or(0)
}

/// Get the number of columns in the session view
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
#[no_mangle]
pub unsafe extern "C" fn csvcf_view_col_count(session: *const CsvcfSession) -> usize {
    session.as_ref().map(|s| s.view.headers.len()).unwrap_or(0)
}

/// Get a column header by index
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `csvcf_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvcf_view_col_name(session: *const CsvcfSession, index: usize) -> *mut c_char {
    session
        .as_ref()
        .and_then(|s| s.view.headers.get(index))
        .map(|h| into_c_string(h))
        .unwrap_or(ptr::null_mut())
}

/// Get a cell value
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvcf_session_new`
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `csvcf_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvcf_view_cell(
    session: *const CsvcfSession,
    row: usize,
    col: usize,
) -> *mut c_char {
    session
        .as_ref()
        .and_then(|s| s.view.cell(row, col))
        .map(into_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a csvcf_view_* function or null
#[no_mangle]
pub unsafe extern "C" fn csvcf_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
