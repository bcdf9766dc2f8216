//! String marshaling between Rust and library-owned C memory

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};

use crate::error::{Error, Result};

/// Convert a Rust string for a call, rejecting interior NULs
pub(crate) fn to_cstring(value: &str, what: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::invalid(format!("{what} contains a NUL byte")))
}

/// Copy a library-allocated string and free it
///
/// # Safety
///
/// `ptr` must be null or a string allocated by the library that the caller
/// owns. It is invalid after this call.
pub(crate) unsafe fn take_string(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let value = CStr::from_ptr(ptr).to_string_lossy().into_owned();
    imagick_sys::MagickRelinquishMemory(ptr as *mut c_void);
    Some(value)
}

/// Copy a library-allocated string array of `count` entries and free it,
/// including every entry
///
/// # Safety
///
/// `list` must be null or an array returned by one of the `*Query*` or
/// `*GetImageArtifacts` functions with `count` matching the reported length.
pub(crate) unsafe fn take_string_array(list: *mut *mut c_char, count: usize) -> Vec<String> {
    if list.is_null() {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        if let Some(value) = take_string(*list.add(i)) {
            values.push(value);
        }
    }
    imagick_sys::MagickRelinquishMemory(list as *mut c_void);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cstring_rejects_nul() {
        assert!(to_cstring("logo:", "filename").is_ok());
        let err = to_cstring("lo\0go:", "filename").unwrap_err();
        assert_eq!(err, Error::InvalidInput("filename contains a NUL byte".into()));
    }

    #[test]
    fn test_take_null() {
        unsafe {
            assert_eq!(take_string(std::ptr::null_mut()), None);
            assert!(take_string_array(std::ptr::null_mut(), 3).is_empty());
        }
    }
}
