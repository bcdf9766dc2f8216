//! Library-wide queries
//!
//! Thin forwarders to the native introspection calls. All of them require
//! the engine to be initialized.

use imagick_sys as sys;

use crate::config::Resource;
use crate::engine;
use crate::error::{static_str, Error, Result};
use crate::strings::{take_string, take_string_array, to_cstring};

type ListQuery = unsafe extern "C" fn(*const std::os::raw::c_char, *mut sys::size_t)
    -> *mut *mut std::os::raw::c_char;

fn query_list(query: ListQuery, pattern: &str) -> Result<Vec<String>> {
    engine::ensure_initialized()?;
    let c_pattern = to_cstring(pattern, "pattern")?;
    let mut count: sys::size_t = 0;
    Ok(unsafe { take_string_array(query(c_pattern.as_ptr(), &mut count), count) })
}

/// Names of build configure options matching a wildcard pattern
pub fn query_configure_options(pattern: &str) -> Result<Vec<String>> {
    query_list(sys::MagickQueryConfigureOptions, pattern)
}

/// Value of one configure option, `NotFound` if the name is unknown
pub fn query_configure_option(option: &str) -> Result<String> {
    engine::ensure_initialized()?;
    let c_option = to_cstring(option, "option")?;
    unsafe { take_string(sys::MagickQueryConfigureOption(c_option.as_ptr())) }
        .ok_or_else(|| Error::NotFound(format!("configure option {option:?}")))
}

/// Font names matching a wildcard pattern
pub fn query_fonts(pattern: &str) -> Result<Vec<String>> {
    query_list(sys::MagickQueryFonts, pattern)
}

/// Image format names matching a wildcard pattern
pub fn query_formats(pattern: &str) -> Result<Vec<String>> {
    query_list(sys::MagickQueryFormats, pattern)
}

type NamedValue = unsafe extern "C" fn(*mut sys::size_t) -> *const std::os::raw::c_char;

fn named_value(query: NamedValue, what: &str) -> Result<(String, usize)> {
    engine::ensure_initialized()?;
    let mut value: sys::size_t = 0;
    let name = unsafe { static_str(query(&mut value)) }.unwrap_or_default();
    check_named_value(what, name, value)
}

fn check_named_value(what: &str, name: String, value: usize) -> Result<(String, usize)> {
    if name.is_empty() {
        return Err(Error::native(format!("{what} query returned no name")));
    }
    if value == 0 {
        return Err(Error::native(format!("{what} query returned {name:?} with value 0")));
    }
    Ok((name, value))
}

/// Quantum depth name and bits per channel, e.g. `("Q16", 16)`
pub fn quantum_depth() -> Result<(String, usize)> {
    named_value(sys::MagickGetQuantumDepth, "quantum depth")
}

/// Quantum range name and maximum channel value, e.g. `("65535", 65535)`
pub fn quantum_range() -> Result<(String, usize)> {
    named_value(sys::MagickGetQuantumRange, "quantum range")
}

/// Library version string and numeric version, e.g. `0x69B`
pub fn version() -> Result<(String, usize)> {
    named_value(sys::MagickGetVersion, "version")
}

/// Current limit for a resource
pub fn resource_limit(resource: Resource) -> Result<u64> {
    engine::ensure_initialized()?;
    Ok(unsafe { sys::MagickGetResourceLimit(resource.to_ffi()) })
}

/// Change a resource limit for the running engine
///
/// The library may clamp the value (e.g. to a policy maximum).
pub fn set_resource_limit(resource: Resource, limit: u64) -> Result<()> {
    engine::ensure_initialized()?;
    let ok = unsafe { sys::is_true(sys::MagickSetResourceLimit(resource.to_ffi(), limit)) };
    if ok {
        Ok(())
    } else {
        Err(Error::native(format!("library rejected {resource:?} limit {limit}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_value_must_be_positive() {
        assert_eq!(
            check_named_value("quantum depth", "Q16".into(), 16).unwrap(),
            ("Q16".to_string(), 16)
        );

        let err = check_named_value("quantum range", "0".into(), 0).unwrap_err();
        assert!(err.is_native(crate::Severity::Error), "{err}");
        assert!(check_named_value("version", String::new(), 0x69b).is_err());
    }
}
