//! Process-wide engine lifecycle
//!
//! The native environment is started by the first [`initialize`] and torn
//! down once every [`initialize`] has been matched by a [`terminate`] and no
//! wand handle is still alive. A wand that outlives the last `terminate`
//! therefore keeps the environment running until it is released.
//!
//! All state lives behind one lock; the per-kind counters in
//! [`registry`](crate::registry) are only mutated while it is held.

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::{self, WandKind};

struct EngineState {
    /// Native genesis has run and terminus has not
    initialized: bool,
    /// Outstanding `initialize` calls
    ref_count: usize,
    /// Applied at the next genesis
    config: Option<Config>,
}

static ENGINE: Mutex<EngineState> = Mutex::new(EngineState {
    initialized: false,
    ref_count: 0,
    config: None,
});

/// Start (or re-reference) the engine
pub fn initialize() {
    acquire(None);
}

/// Start (or re-reference) the engine, applying `config`
///
/// If the engine is already running the limits are applied immediately and
/// also kept for any later genesis.
pub fn initialize_with(config: Config) {
    acquire(Some(config));
}

fn acquire(config: Option<Config>) {
    let mut state = ENGINE.lock();

    if let Some(config) = config {
        if state.initialized {
            config.apply();
        }
        state.config = Some(config);
    }

    state.ref_count += 1;

    if !state.initialized {
        log::debug!("MagickWandGenesis");
        unsafe { imagick_sys::MagickWandGenesis() };
        state.initialized = true;

        if let Some(config) = &state.config {
            config.apply();
        }
    }
}

/// Drop one reference to the engine
///
/// Calling this without a matching [`initialize`] is a programming error; it
/// is logged and otherwise ignored.
pub fn terminate() {
    let mut state = ENGINE.lock();

    if state.ref_count == 0 {
        log::warn!("terminate() called without a matching initialize()");
        return;
    }

    state.ref_count -= 1;
    maybe_teardown(&mut state);
}

fn maybe_teardown(state: &mut EngineState) {
    if !state.initialized || state.ref_count > 0 {
        return;
    }

    let live = registry::total();
    if live > 0 {
        log::debug!("Deferring MagickWandTerminus until {} live handle(s) are released", live);
        return;
    }

    log::debug!("MagickWandTerminus");
    unsafe { imagick_sys::MagickWandTerminus() };
    state.initialized = false;
}

/// Whether the native environment is currently running
pub fn is_initialized() -> bool {
    ENGINE.lock().initialized
}

/// Number of outstanding [`initialize`] calls
pub fn ref_count() -> usize {
    ENGINE.lock().ref_count
}

/// Fail unless a caller currently holds the engine
pub(crate) fn ensure_initialized() -> Result<()> {
    if ENGINE.lock().ref_count == 0 {
        Err(Error::EngineNotInitialized)
    } else {
        Ok(())
    }
}

/// Account for a handle about to be allocated
pub(crate) fn retain(kind: WandKind) -> Result<()> {
    let state = ENGINE.lock();
    if state.ref_count == 0 {
        return Err(Error::EngineNotInitialized);
    }
    registry::increment(kind);
    Ok(())
}

/// Account for a handle that was released (or never allocated after
/// [`retain`])
pub(crate) fn release(kind: WandKind) {
    let mut state = ENGINE.lock();
    registry::decrement(kind);
    maybe_teardown(&mut state);
}

/// Scoped engine reference
///
/// Holds one [`initialize`] for its lifetime and calls [`terminate`] when
/// dropped.
///
/// ```no_run
/// let _engine = imagick::Engine::new();
/// let mut wand = imagick::ImageWand::new()?;
/// wand.read_image("logo:")?;
/// # Ok::<(), imagick::Error>(())
/// ```
#[must_use = "the engine is terminated when this guard is dropped"]
pub struct Engine {
    _private: (),
}

impl Engine {
    pub fn new() -> Self {
        initialize();
        Self { _private: () }
    }

    pub fn with_config(config: Config) -> Self {
        initialize_with(config);
        Self { _private: () }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        terminate();
    }
}
