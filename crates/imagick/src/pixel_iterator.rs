//! Row-wise pixel access

use std::marker::PhantomData;

use imagick_sys as sys;

use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::magick_wand::ImageWand;
use crate::pixels::Region;
use crate::strings::{take_string, to_cstring};

/// Owner of one native `PixelIterator` over the current image of an
/// [`ImageWand`]
///
/// The iterator borrows the image wand, so the image cannot be dropped or
/// mutated through the wand while rows are being visited. Changes made
/// through a [`PixelRow`] reach the image only after [`sync`](Self::sync).
pub struct PixelIterator<'w> {
    handle: Handle<sys::PixelIterator>,
    _image: PhantomData<&'w ImageWand>,
}

impl<'w> PixelIterator<'w> {
    /// Iterate over every row of the current image
    pub fn new(wand: &'w ImageWand) -> Result<Self> {
        let mw = wand.handle.get()?;
        let handle = Handle::allocate_or(
            || unsafe { sys::NewPixelIterator(mw) },
            || wand.handle.last_error(),
        )?;
        Ok(Self {
            handle,
            _image: PhantomData,
        })
    }

    /// Iterate over the rows of `region` only
    pub fn region(wand: &'w ImageWand, region: Region) -> Result<Self> {
        let mw = wand.handle.get()?;
        region.ensure_non_empty()?;
        let handle = Handle::allocate_or(
            || unsafe {
                sys::NewPixelRegionIterator(mw, region.x, region.y, region.width, region.height)
            },
            || wand.handle.last_error(),
        )?;
        Ok(Self {
            handle,
            _image: PhantomData,
        })
    }

    /// Independent iterator at the same position over the same image
    pub fn try_clone(&self) -> Result<PixelIterator<'w>> {
        Ok(Self {
            handle: self.handle.duplicate()?,
            _image: PhantomData,
        })
    }

    /// Release the native handle now. Calling it again does nothing.
    pub fn destroy(&mut self) {
        self.handle.release();
    }

    pub fn is_destroyed(&self) -> bool {
        self.handle.is_destroyed()
    }

    pub fn is_verified(&self) -> bool {
        self.handle.is_verified()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.handle.clear()
    }

    /// Advance and return the next row, `None` past the last one
    pub fn next_row(&mut self) -> Result<Option<PixelRow<'_>>> {
        let ptr = self.handle.get()?;
        let mut count: sys::size_t = 0;
        let wands = unsafe { sys::PixelGetNextIteratorRow(ptr, &mut count) };
        Ok(PixelRow::from_raw(wands, count))
    }

    /// The row at the current position without advancing
    pub fn current_row(&mut self) -> Result<PixelRow<'_>> {
        let ptr = self.handle.get()?;
        let mut count: sys::size_t = 0;
        let wands = unsafe { sys::PixelGetCurrentIteratorRow(ptr, &mut count) };
        PixelRow::from_raw(wands, count).ok_or_else(|| self.handle.last_error())
    }

    /// Current row index
    pub fn row(&self) -> Result<isize> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::PixelGetIteratorRow(ptr) })
    }

    /// Move to `row` so that [`current_row`](Self::current_row) returns it
    pub fn set_row(&mut self, row: isize) -> Result<()> {
        let ptr = self.handle.get()?;
        let status = unsafe { sys::PixelSetIteratorRow(ptr, row) };
        self.handle.check(status)
    }

    /// Rewind before the first row
    pub fn reset(&mut self) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::PixelResetIterator(ptr) };
        Ok(())
    }

    /// Write the current row back to the image
    pub fn sync(&mut self) -> Result<()> {
        let ptr = self.handle.get()?;
        let status = unsafe { sys::PixelSyncIterator(ptr) };
        self.handle.check(status)
    }

    /// Visit every remaining row, syncing each one after `f` returns
    pub fn update_rows<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(isize, &mut PixelRow<'_>) -> Result<()>,
    {
        loop {
            if self.next_row()?.is_none() {
                return Ok(());
            }
            let index = self.row()?;
            let mut row = self.current_row()?;
            f(index, &mut row)?;
            self.sync()?;
        }
    }
}

impl std::fmt::Debug for PixelIterator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelIterator")
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// One row of pixel wands owned by a [`PixelIterator`]
///
/// The wands are not counted handles: the iterator frees them.
pub struct PixelRow<'r> {
    wands: &'r [*mut sys::PixelWand],
}

impl<'r> PixelRow<'r> {
    fn from_raw(wands: *mut *mut sys::PixelWand, count: usize) -> Option<Self> {
        if wands.is_null() {
            return None;
        }
        let wands = unsafe { std::slice::from_raw_parts(wands as *const _, count) };
        Some(Self { wands })
    }

    /// Pixels in the row
    pub fn len(&self) -> usize {
        self.wands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wands.is_empty()
    }

    pub fn pixel(&mut self, index: usize) -> Option<PixelRef<'_>> {
        self.wands.get(index).map(|&ptr| PixelRef::new(ptr))
    }

    pub fn pixels(&mut self) -> impl Iterator<Item = PixelRef<'_>> + '_ {
        self.wands.iter().map(|&ptr| PixelRef::new(ptr))
    }
}

/// Borrowed view of one pixel in a [`PixelRow`]
pub struct PixelRef<'p> {
    ptr: *mut sys::PixelWand,
    _row: PhantomData<&'p mut sys::PixelWand>,
}

impl<'p> PixelRef<'p> {
    fn new(ptr: *mut sys::PixelWand) -> Self {
        Self {
            ptr,
            _row: PhantomData,
        }
    }

    pub fn red(&self) -> f64 {
        unsafe { sys::PixelGetRed(self.ptr) }
    }

    pub fn green(&self) -> f64 {
        unsafe { sys::PixelGetGreen(self.ptr) }
    }

    pub fn blue(&self) -> f64 {
        unsafe { sys::PixelGetBlue(self.ptr) }
    }

    pub fn alpha(&self) -> f64 {
        unsafe { sys::PixelGetAlpha(self.ptr) }
    }

    pub fn set_red(&mut self, value: f64) {
        unsafe { sys::PixelSetRed(self.ptr, value) }
    }

    pub fn set_green(&mut self, value: f64) {
        unsafe { sys::PixelSetGreen(self.ptr, value) }
    }

    pub fn set_blue(&mut self, value: f64) {
        unsafe { sys::PixelSetBlue(self.ptr, value) }
    }

    pub fn set_alpha(&mut self, value: f64) {
        unsafe { sys::PixelSetAlpha(self.ptr, value) }
    }

    pub fn set_color(&mut self, color: &str) -> Result<()> {
        let c_color = to_cstring(color, "color")?;
        let status = unsafe { sys::PixelSetColor(self.ptr, c_color.as_ptr()) };
        if sys::is_true(status) {
            return Ok(());
        }
        let mut code = sys::UndefinedException;
        unsafe {
            let description = sys::PixelGetException(self.ptr, &mut code);
            sys::PixelClearException(self.ptr);
            Err(Error::from_exception(description, code))
        }
    }

    pub fn color_as_string(&self) -> String {
        unsafe { take_string(sys::PixelGetColorAsString(self.ptr)) }.unwrap_or_default()
    }
}
