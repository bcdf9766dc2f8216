//! Drawing wand

use imagick_sys as sys;

use crate::error::Result;
use crate::handle::Handle;
use crate::pixel_wand::PixelWand;

/// Owner of one native `DrawingWand`, a recorded list of vector primitives
/// rendered with [`ImageWand::draw_image`](crate::ImageWand::draw_image)
pub struct DrawingWand {
    pub(crate) handle: Handle<sys::DrawingWand>,
}

impl DrawingWand {
    pub fn new() -> Result<Self> {
        let handle = Handle::allocate(|| unsafe { sys::NewDrawingWand() })?;
        Ok(Self { handle })
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

    /// The color is copied; `color` may be dropped afterwards
    pub fn set_fill_color(&mut self, color: &PixelWand) -> Result<()> {
        let ptr = self.handle.get()?;
        let pw = color.handle.get()?;
        unsafe { sys::DrawSetFillColor(ptr, pw) };
        Ok(())
    }

    pub fn set_stroke_color(&mut self, color: &PixelWand) -> Result<()> {
        let ptr = self.handle.get()?;
        let pw = color.handle.get()?;
        unsafe { sys::DrawSetStrokeColor(ptr, pw) };
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::DrawSetStrokeWidth(ptr, width) };
        Ok(())
    }

    pub fn stroke_width(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::DrawGetStrokeWidth(ptr) })
    }

    pub fn set_font_size(&mut self, pointsize: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::DrawSetFontSize(ptr, pointsize) };
        Ok(())
    }

    pub fn font_size(&self) -> Result<f64> {
        let ptr = self.handle.get()?;
        Ok(unsafe { sys::DrawGetFontSize(ptr) })
    }

    pub fn rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::DrawRectangle(ptr, x1, y1, x2, y2) };
        Ok(())
    }

    pub fn line(&mut self, sx: f64, sy: f64, ex: f64, ey: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::DrawLine(ptr, sx, sy, ex, ey) };
        Ok(())
    }

    /// Circle centred on `(ox, oy)` passing through `(px, py)`
    pub fn circle(&mut self, ox: f64, oy: f64, px: f64, py: f64) -> Result<()> {
        let ptr = self.handle.get()?;
        unsafe { sys::DrawCircle(ptr, ox, oy, px, py) };
        Ok(())
    }
}

impl std::fmt::Debug for DrawingWand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingWand")
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
