//! Image wand

use std::os::raw::c_void;

use imagick_sys as sys;

use crate::drawing_wand::DrawingWand;
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::pixel_iterator::PixelIterator;
use crate::pixel_wand::PixelWand;
use crate::pixels::{self, PixelBuffer, RawPixels, Region, StorageType};
use crate::strings::{take_string, take_string_array, to_cstring};

/// Owner of one native `MagickWand`: an image list plus a current image
///
/// The handle is released when the wand is dropped, or earlier by
/// [`destroy`](Self::destroy). Every method fails with
/// [`Error::ObjectDestroyed`] after that.
pub struct ImageWand {
    pub(crate) handle: Handle<sys::MagickWand>,
}

impl ImageWand {
    /// Allocate an empty wand
    ///
    /// Fails with [`Error::EngineNotInitialized`] unless the engine is held.
    pub fn new() -> Result<Self> {
        let handle = Handle::allocate(|| unsafe { sys::NewMagickWand() })?;
        Ok(Self { handle })
    }

    /// Deep copy of the wand and all its images
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            handle: self.handle.duplicate()?,
        })
    }

    /// Release the native handle now. Calling it again does nothing.
    pub fn destroy(&mut self) {
        self.handle.release();
    }

    pub fn is_destroyed(&self) -> bool {
        self.handle.is_destroyed()
    }

    /// Whether the wand holds a live handle the library recognises
    pub fn is_verified(&self) -> bool {
        self.handle.is_verified()
    }

    /// Remove all images and reset settings
    pub fn clear(&mut self) -> Result<()> {
        self.handle.clear()
    }

    // =========================================================================
    // I/O
    // =========================================================================

    /// Read an image from a path or pseudo-format such as `logo:`
    pub fn read_image(&mut self, filename: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        if filename.is_empty() {
            return Err(Error::invalid("filename must not be empty"));
        }
        let c_name = to_cstring(filename, "filename")?;
        let status = unsafe { sys::MagickReadImage(ptr, c_name.as_ptr()) };
        self.handle.check(status)
    }

    /// Decode an image from encoded bytes
    pub fn read_image_blob(&mut self, blob: &[u8]) -> Result<()> {
        let ptr = self.handle.get()?;
        if blob.is_empty() {
            return Err(Error::invalid("image blob must not be empty"));
        }
        let status =
            unsafe { sys::MagickReadImageBlob(ptr, blob.as_ptr() as *const c_void, blob.len()) };
        self.handle.check(status)
    }

    /// Encode the current image in its current format
    pub fn image_blob(&mut self) -> Result<Vec<u8>> {
        let ptr = self.handle.get()?;
        let mut length: sys::size_t = 0;
        let data = unsafe { sys::MagickGetImageBlob(ptr, &mut length) };
        if data.is_null() {
            return Err(self.handle.last_error());
        }

        let bytes = unsafe { std::slice::from_raw_parts(data, length).to_vec() };
        unsafe { sys::MagickRelinquishMemory(data as *mut c_void) };
        Ok(bytes)
    }

    /// Append a blank `columns` x `rows` image filled with `background`
    pub fn new_image(&mut self, columns: usize, rows: usize, background: &PixelWand) -> Result<()> {
        let ptr = self.handle.get()?;
        Region::whole(columns, rows).ensure_non_empty()?;
        let bg = background.handle.get()?;
        let status = unsafe { sys::MagickNewImage(ptr, columns, rows, bg) };
        self.handle.check(status)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn width(&self) -> Result<usize> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::MagickGetImageWidth(ptr) })
    }

    pub fn height(&self) -> Result<usize> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::MagickGetImageHeight(ptr) })
    }

    /// Number of images in the list
    pub fn number_images(&self) -> Result<usize> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::MagickGetNumberImages(ptr) })
    }

    /// Format of the current image (e.g. "GIF"), empty if unset
    pub fn image_format(&self) -> Result<String> {
        let ptr = self.handle.get()?;
        Ok(unsafe { take_string(sys::MagickGetImageFormat(ptr)) }.unwrap_or_default())
    }

    pub fn set_image_format(&mut self, format: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        let c_format = to_cstring(format, "format")?;
        let status = unsafe { sys::MagickSetImageFormat(ptr, c_format.as_ptr()) };
        self.handle.check(status)
    }

    pub fn scale_image(&mut self, columns: usize, rows: usize) -> Result<()> {
        let ptr = self.handle.get()?;
        Region::whole(columns, rows).ensure_non_empty()?;
        let status = unsafe { sys::MagickScaleImage(ptr, columns, rows) };
        self.handle.check(status)
    }

    /// Render a drawing onto the current image
    pub fn draw_image(&mut self, drawing: &DrawingWand) -> Result<()> {
        let ptr = self.handle.get()?;
        let dw = drawing.handle.get()?;
        let status = unsafe { sys::MagickDrawImage(ptr, dw) };
        self.handle.check(status)
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    pub fn set_image_artifact(&mut self, name: &str, value: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        let c_name = to_cstring(name, "artifact name")?;
        let c_value = to_cstring(value, "artifact value")?;
        let status = unsafe { sys::MagickSetImageArtifact(ptr, c_name.as_ptr(), c_value.as_ptr()) };
        self.handle.check(status)
    }

    /// Value of one artifact, `NotFound` if unset
    pub fn image_artifact(&self, name: &str) -> Result<String> {
        let ptr = self.handle.get()?;
        let c_name = to_cstring(name, "artifact name")?;
        unsafe { take_string(sys::MagickGetImageArtifact(ptr, c_name.as_ptr())) }
            .ok_or_else(|| Error::NotFound(format!("image artifact {name:?}")))
    }

    /// Names of artifacts matching a wildcard pattern
    pub fn image_artifacts(&self, pattern: &str) -> Result<Vec<String>> {
        let ptr = self.handle.get()?;
        let c_pattern = to_cstring(pattern, "pattern")?;
        let mut count: sys::size_t = 0;
        let list = unsafe { sys::MagickGetImageArtifacts(ptr, c_pattern.as_ptr(), &mut count) };
        if list.is_null() {
            return no_list_or_error(&self.handle);
        }
        Ok(unsafe { take_string_array(list, count) })
    }

    /// Delete every artifact whose name matches a wildcard pattern
    ///
    /// Matching nothing is not an error.
    pub fn delete_image_artifact(&mut self, pattern: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        for name in self.image_artifacts(pattern)? {
            let c_name = to_cstring(&name, "artifact name")?;
            let status = unsafe { sys::MagickDeleteImageArtifact(ptr, c_name.as_ptr()) };
            if !sys::is_true(status) {
                // false with nothing recorded: the artifact is already gone
                if let Some(err) = pending_error(&self.handle) {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Pixels
    // =========================================================================

    /// Copy `region` of the current image into a new buffer
    ///
    /// The returned variant is fixed by `storage`: `Char` gives
    /// [`PixelBuffer::Char`], `Float` gives [`PixelBuffer::Float`] and so on.
    /// Its length is `width * height * map.len()`.
    ///
    /// ```no_run
    /// # use imagick::{ImageWand, Region, StorageType};
    /// # fn run(wand: &ImageWand) -> imagick::Result<()> {
    /// let (w, h) = (wand.width()?, wand.height()?);
    /// let rgb = wand
    ///     .export_image_pixels(Region::whole(w, h), "RGB", StorageType::Float)?
    ///     .into_vec::<f32>()?;
    /// assert_eq!(rgb.len(), w * h * 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn export_image_pixels(
        &self,
        region: Region,
        map: &str,
        storage: StorageType,
    ) -> Result<PixelBuffer> {
        pixels::export(&self.handle, region, map, storage)
    }

    /// Write samples into `region` of the current image
    ///
    /// Pass `StorageType::Undefined` to use the buffer's own type. The buffer
    /// must hold exactly `width * height * map.len()` samples.
    pub fn import_image_pixels<'a>(
        &mut self,
        region: Region,
        map: &str,
        storage: StorageType,
        pixels: impl Into<RawPixels<'a>>,
    ) -> Result<()> {
        pixels::import(&self.handle, region, map, storage, pixels.into())
    }

    /// Iterator over every row of the current image
    pub fn pixel_iterator(&self) -> Result<PixelIterator<'_>> {
        PixelIterator::new(self)
    }

    /// Iterator over the rows of `region`
    pub fn pixel_region_iterator(&self, region: Region) -> Result<PixelIterator<'_>> {
        PixelIterator::region(self, region)
    }
}

/// A null list is either "nothing matched" or a failure with a recorded
/// exception
fn no_list_or_error(handle: &Handle<sys::MagickWand>) -> Result<Vec<String>> {
    pending_error(handle).map_or(Ok(Vec::new()), Err)
}

/// Take the wand's recorded exception, if there is one
fn pending_error(handle: &Handle<sys::MagickWand>) -> Option<Error> {
    match handle.last_error() {
        Error::Native { code, .. } if code == sys::UndefinedException => None,
        err => Some(err),
    }
}

impl std::fmt::Debug for ImageWand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageWand")
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
