//! Error types for the imagick crate

use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_char;

use thiserror::Error;

use crate::registry::WandKind;

/// Result type alias for imagick operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for imagick operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No `initialize()` call is currently outstanding
    #[error("ImageMagick engine is not initialized")]
    EngineNotInitialized,

    /// Operation on a wand whose handle was already released
    #[error("{0} was already destroyed")]
    ObjectDestroyed(WandKind),

    /// Invalid argument passed to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Buffer element type has no matching storage type
    #[error("Unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// Pixel buffer length does not match the region and channel map
    #[error("Pixel buffer length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The native library reported a failure
    #[error("{severity} ({code}): {description}")]
    Native {
        severity: Severity,
        code: i32,
        description: String,
    },

    /// Lookup yielded nothing
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Severity class of a native exception code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Undefined,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Classify a raw `ExceptionType` code
    pub fn from_code(code: i32) -> Self {
        match code {
            c if c >= imagick_sys::FatalErrorException => Severity::Fatal,
            c if c >= imagick_sys::ErrorException => Severity::Error,
            c if c >= imagick_sys::WarningException => Severity::Warning,
            _ => Severity::Undefined,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Undefined => "UndefinedException",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "FatalError",
        };
        f.write_str(name)
    }
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Build a native error from an exception description the library
    /// allocated. The description is copied and then released.
    ///
    /// # Safety
    ///
    /// `description` must be null or a string returned by one of the
    /// `*GetException` functions that has not been freed yet.
    pub(crate) unsafe fn from_exception(description: *mut c_char, code: i32) -> Self {
        let text = crate::strings::take_string(description).unwrap_or_default();
        let description = if text.is_empty() {
            "unknown native failure".to_string()
        } else {
            text
        };

        Error::Native {
            severity: Severity::from_code(code),
            code,
            description,
        }
    }

    /// Native failure without a wand to ask for details
    pub(crate) fn native(description: impl Into<String>) -> Self {
        Error::Native {
            severity: Severity::Error,
            code: imagick_sys::ErrorException,
            description: description.into(),
        }
    }

    /// Whether this is a native failure of the given severity
    pub fn is_native(&self, severity: Severity) -> bool {
        matches!(self, Error::Native { severity: s, .. } if *s == severity)
    }
}

/// Copy a static C string returned by the library
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn static_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}
