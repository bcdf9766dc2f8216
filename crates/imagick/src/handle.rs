//! Owned native handle shared by all wand wrappers
//!
//! A [`Handle`] owns exactly one native pointer. Allocation goes through
//! [`engine::retain`] so the live counters and engine lifetime stay in step,
//! and release happens at most once: [`Handle::release`] nulls the pointer,
//! which also disarms the release in `Drop`.

use std::os::raw::c_char;
use std::ptr;

use imagick_sys::{self as sys, ExceptionType, MagickBooleanType};

use crate::engine;
use crate::error::{Error, Result};
use crate::registry::WandKind;

/// Per-type native entry points
pub(crate) trait RawWand {
    const KIND: WandKind;

    unsafe fn duplicate(ptr: *const Self) -> *mut Self;
    unsafe fn destroy(ptr: *mut Self);
    unsafe fn is_valid(ptr: *const Self) -> bool;
    unsafe fn clear(ptr: *mut Self);
    unsafe fn exception(ptr: *const Self, code: *mut ExceptionType) -> *mut c_char;
    unsafe fn clear_exception(ptr: *mut Self);
}

impl RawWand for sys::MagickWand {
    const KIND: WandKind = WandKind::Image;

    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        sys::CloneMagickWand(ptr)
    }
    unsafe fn destroy(ptr: *mut Self) {
        sys::DestroyMagickWand(ptr);
    }
    unsafe fn is_valid(ptr: *const Self) -> bool {
        sys::is_true(sys::IsMagickWand(ptr))
    }
    unsafe fn clear(ptr: *mut Self) {
        sys::ClearMagickWand(ptr)
    }
    unsafe fn exception(ptr: *const Self, code: *mut ExceptionType) -> *mut c_char {
        sys::MagickGetException(ptr, code)
    }
    unsafe fn clear_exception(ptr: *mut Self) {
        sys::MagickClearException(ptr);
    }
}

impl RawWand for sys::DrawingWand {
    const KIND: WandKind = WandKind::Drawing;

    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        sys::CloneDrawingWand(ptr)
    }
    unsafe fn destroy(ptr: *mut Self) {
        sys::DestroyDrawingWand(ptr);
    }
    unsafe fn is_valid(ptr: *const Self) -> bool {
        sys::is_true(sys::IsDrawingWand(ptr))
    }
    unsafe fn clear(ptr: *mut Self) {
        sys::ClearDrawingWand(ptr)
    }
    unsafe fn exception(ptr: *const Self, code: *mut ExceptionType) -> *mut c_char {
        sys::DrawGetException(ptr, code)
    }
    unsafe fn clear_exception(ptr: *mut Self) {
        sys::DrawClearException(ptr);
    }
}

impl RawWand for sys::PixelWand {
    const KIND: WandKind = WandKind::Pixel;

    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        sys::ClonePixelWand(ptr)
    }
    unsafe fn destroy(ptr: *mut Self) {
        sys::DestroyPixelWand(ptr);
    }
    unsafe fn is_valid(ptr: *const Self) -> bool {
        sys::is_true(sys::IsPixelWand(ptr))
    }
    unsafe fn clear(ptr: *mut Self) {
        sys::ClearPixelWand(ptr)
    }
    unsafe fn exception(ptr: *const Self, code: *mut ExceptionType) -> *mut c_char {
        sys::PixelGetException(ptr, code)
    }
    unsafe fn clear_exception(ptr: *mut Self) {
        sys::PixelClearException(ptr);
    }
}

impl RawWand for sys::PixelIterator {
    const KIND: WandKind = WandKind::PixelIterator;

    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        sys::ClonePixelIterator(ptr)
    }
    unsafe fn destroy(ptr: *mut Self) {
        sys::DestroyPixelIterator(ptr);
    }
    unsafe fn is_valid(ptr: *const Self) -> bool {
        sys::is_true(sys::IsPixelIterator(ptr))
    }
    unsafe fn clear(ptr: *mut Self) {
        sys::ClearPixelIterator(ptr)
    }
    unsafe fn exception(ptr: *const Self, code: *mut ExceptionType) -> *mut c_char {
        sys::PixelGetIteratorException(ptr, code)
    }
    unsafe fn clear_exception(ptr: *mut Self) {
        sys::PixelClearIteratorException(ptr);
    }
}

/// Exclusive owner of one native handle
pub(crate) struct Handle<W: RawWand> {
    ptr: *mut W,
}

// A handle is never aliased, and the library does not tie wands to the
// thread that created them.
unsafe impl<W: RawWand> Send for Handle<W> {}

impl<W: RawWand> Handle<W> {
    /// Register with the engine, then allocate with `alloc`
    pub(crate) fn allocate(alloc: impl FnOnce() -> *mut W) -> Result<Self> {
        Self::allocate_or(alloc, || Error::native(format!("failed to allocate {}", W::KIND)))
    }

    /// Like [`allocate`](Self::allocate), with `on_null` describing why a
    /// null came back
    pub(crate) fn allocate_or(
        alloc: impl FnOnce() -> *mut W,
        on_null: impl FnOnce() -> Error,
    ) -> Result<Self> {
        engine::retain(W::KIND)?;

        let ptr = alloc();
        if ptr.is_null() {
            engine::release(W::KIND);
            return Err(on_null());
        }

        log::trace!("Allocated {} {:p}", W::KIND, ptr);
        Ok(Self { ptr })
    }

    /// Deep native copy in a new handle
    pub(crate) fn duplicate(&self) -> Result<Self> {
        let src = self.get()?;
        let copy = Self::allocate(|| unsafe { W::duplicate(src) })?;
        log::trace!("Cloned {} {:p} -> {:p}", W::KIND, src, copy.ptr);
        Ok(copy)
    }

    /// The live pointer, or `ObjectDestroyed`
    #[inline]
    pub(crate) fn get(&self) -> Result<*mut W> {
        if self.ptr.is_null() {
            Err(Error::ObjectDestroyed(W::KIND))
        } else {
            Ok(self.ptr)
        }
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.ptr.is_null()
    }

    pub(crate) fn is_verified(&self) -> bool {
        !self.ptr.is_null() && unsafe { W::is_valid(self.ptr) }
    }

    pub(crate) fn clear(&mut self) -> Result<()> {
        let ptr = self.get()?;
        unsafe { W::clear(ptr) };
        Ok(())
    }

    /// Release the native handle; later calls are no-ops
    pub(crate) fn release(&mut self) {
        let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
        if ptr.is_null() {
            return;
        }

        if unsafe { W::is_valid(ptr) } {
            unsafe { W::destroy(ptr) };
            log::trace!("Released {} {:p}", W::KIND, ptr);
        } else {
            log::warn!("{} {:p} failed its signature check; not destroying", W::KIND, ptr);
        }

        engine::release(W::KIND);
    }

    /// Take and clear the pending native exception
    pub(crate) fn last_error(&self) -> Error {
        match self.get() {
            Err(err) => err,
            Ok(ptr) => unsafe {
                let mut code: ExceptionType = sys::UndefinedException;
                let description = W::exception(ptr, &mut code);
                W::clear_exception(ptr);
                Error::from_exception(description, code)
            },
        }
    }

    /// Map a native boolean result to `Result`
    pub(crate) fn check(&self, status: MagickBooleanType) -> Result<()> {
        if sys::is_true(status) {
            Ok(())
        } else {
            Err(self.last_error())
        }
    }
}

impl<W: RawWand> Drop for Handle<W> {
    fn drop(&mut self) {
        self.release();
    }
}
