//! Safe Rust wrapper for the ImageMagick MagickWand API
//!
//! Each wand type owns one native handle. Handles are released when the
//! wrapper is dropped, or earlier with `destroy()`; after that every method
//! returns [`Error::ObjectDestroyed`]. The engine itself is reference
//! counted (see [`engine`]) and is only torn down once no handle is alive.
//!
//! # Example
//!
//! ```no_run
//! use imagick::{Engine, ImageWand, Region, StorageType};
//!
//! let _engine = Engine::new();
//!
//! let mut wand = ImageWand::new()?;
//! wand.read_image("logo:")?;
//!
//! let (w, h) = (wand.width()?, wand.height()?);
//! let pixels = wand.export_image_pixels(Region::whole(w, h), "RGB", StorageType::Float)?;
//! assert_eq!(pixels.len(), w * h * 3);
//!
//! wand.import_image_pixels(Region::whole(w, h), "RGB", StorageType::Undefined, &pixels)?;
//! # Ok::<(), imagick::Error>(())
//! ```

mod config;
mod drawing_wand;
pub mod engine;
mod error;
mod handle;
mod magick_wand;
mod pixel_iterator;
mod pixel_wand;
mod pixels;
pub mod query;
pub mod registry;
mod strings;

pub use config::{Config, Resource, ResourceLimits};
pub use drawing_wand::DrawingWand;
pub use engine::{initialize, initialize_with, terminate, Engine};
pub use error::{Error, Result, Severity};
pub use magick_wand::ImageWand;
pub use pixel_iterator::{PixelIterator, PixelRef, PixelRow};
pub use pixel_wand::PixelWand;
pub use pixels::{ChannelMap, Pixel, PixelBuffer, RawPixels, Region, Sample, StorageType};
pub use registry::WandKind;

/// Re-export imagick-sys for advanced usage
pub use imagick_sys as ffi;
