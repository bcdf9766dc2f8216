//! Pixel (color) wand

use imagick_sys as sys;

use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::strings::{take_string, to_cstring};

/// Owner of one native `PixelWand`, a single color value
///
/// Channel values are normalized to `0.0..=1.0`.
pub struct PixelWand {
    pub(crate) handle: Handle<sys::PixelWand>,
}

impl PixelWand {
    pub fn new() -> Result<Self> {
        let handle = Handle::allocate(|| unsafe { sys::NewPixelWand() })?;
        Ok(Self { handle })
    }

    /// New wand set to a color specification such as `"red"` or `"#00ff0080"`
    pub fn with_color(color: &str) -> Result<Self> {
        let mut wand = Self::new()?;
        wand.set_color(color)?;
        Ok(wand)
    }

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

    pub fn is_verified(&self) -> bool {
        self.handle.is_verified()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.handle.clear()
    }

    pub fn set_color(&mut self, color: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        let c_color = to_cstring(color, "color")?;
        let status = unsafe { sys::PixelSetColor(ptr, c_color.as_ptr()) };
        self.handle.check(status)
    }

    /// Color as `srgb(...)`/`srgba(...)` text
    pub fn color_as_string(&self) -> Result<String> {
        let ptr = self.handle.get()?;
        unsafe { take_string(sys::PixelGetColorAsString(ptr)) }
            .ok_or_else(|| Error::native("PixelGetColorAsString returned null"))
    }

    /// Color as comma separated normalized channel values
    pub fn color_as_normalized_string(&self) -> Result<String> {
        let ptr = self.handle.get()?;
        unsafe { take_string(sys::PixelGetColorAsNormalizedString(ptr)) }
            .ok_or_else(|| Error::native("PixelGetColorAsNormalizedString returned null"))
    }

    pub fn red(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::PixelGetRed(ptr) })
    }

    pub fn green(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::PixelGetGreen(ptr) })
    }

    pub fn blue(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::PixelGetBlue(ptr) })
    }

    pub fn alpha(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::PixelGetAlpha(ptr) })
    }

    pub fn set_red(&mut self, value: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::PixelSetRed(ptr, value) };
        Ok(())
    }

    pub fn set_green(&mut self, value: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::PixelSetGreen(ptr, value) };
        Ok(())
    }

    pub fn set_blue(&mut self, value: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::PixelSetBlue(ptr, value) };
        Ok(())
    }

    pub fn set_alpha(&mut self, value: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::PixelSetAlpha(ptr, value) };
        Ok(())
    }

    /// Whether two colors are within `fuzz` (in quantum units) of each other
    pub fn is_similar(&self, other: &PixelWand, fuzz: f64) -> Result<bool> {
        let p = self.handle.get()?;
        let q = other.handle.get()?;
        Ok(sys::is_true(unsafe { sys::IsPixelWandSimilar(p, q, fuzz) }))
    }
}

impl std::fmt::Debug for PixelWand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("PixelWand");
        match self.color_as_string() {
            Ok(color) => s.field("color", &color),
            Err(_) => s.field("destroyed", &self.is_destroyed()),
        };
        s.finish()
    }
}
