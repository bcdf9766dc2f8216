//! Shared helpers for tests that talk to the native library.
//!
//! The handle counters are process-wide, so every test in a binary takes the
//! same lock before creating wands.

#![allow(dead_code)]

use std::sync::Once;

use imagick::{registry, Engine, ImageWand};
use parking_lot::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());
static KEEP_ALIVE: Once = Once::new();

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serialize against other tests in this binary
pub fn serial() -> MutexGuard<'static, ()> {
    init_logger();
    SERIAL.lock()
}

/// A serialized test holding its own engine reference
pub struct Session {
    _engine: Engine,
    _lock: MutexGuard<'static, ()>,
}

/// Start a test session.
///
/// One extra engine reference is leaked for the life of the test binary so
/// that sessions never cycle the native environment through
/// genesis/terminus; `engine_test.rs` covers that path on its own.
pub fn session() -> Session {
    let lock = serial();
    KEEP_ALIVE.call_once(|| std::mem::forget(Engine::new()));
    Session {
        _engine: Engine::new(),
        _lock: lock,
    }
}

/// Fail if any wand handle is still alive
pub fn assert_clean() {
    assert!(
        registry::is_clean(),
        "Some ImageMagick objects are not destroyed\n{}",
        registry::snapshot()
    );
}

/// Wand holding the built-in logo image
pub fn logo() -> ImageWand {
    let mut wand = ImageWand::new().unwrap();
    wand.read_image("logo:").expect("Failed to read internal logo: image");
    wand
}
