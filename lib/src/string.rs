use core::ffi::{CStr, c_char};

/// Borrow a NUL-terminated pointer as a `CStr`, or `None` for null.
///
/// # Safety
///
/// The pointer must be valid and point to a NUL-terminated string that
/// outlives `'a`, or be null.
#[inline]
pub unsafe fn cstr_from_ptr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) })
    }
}

/// Value part of a `NAME=value` environment entry if the name matches.
#[inline]
pub fn env_value<'a>(entry: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    if entry.len() > name.len() && entry[name.len()] == b'=' && &entry[..name.len()] == name {
        Some(&entry[name.len() + 1..])
    } else {
        None
    }
}
