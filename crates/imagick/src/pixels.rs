//! Pixel buffer marshaling
//!
//! Samples cross the boundary as flat buffers laid out pixel by pixel, row by
//! row, with one sample per character of the channel map. The element type of
//! a buffer is described by [`StorageType`]:
//!
//! | `StorageType` | Native type      | Rust buffer                      | Also accepted on import |
//! |---------------|------------------|----------------------------------|-------------------------|
//! | `Char`        | `unsigned char`  | `PixelBuffer::Char(Vec<u8>)`     |                         |
//! | `Short`       | `unsigned short` | `PixelBuffer::Short(Vec<u16>)`   | `i16`                   |
//! | `Integer`     | `unsigned int`   | `PixelBuffer::Integer(Vec<u32>)` | `i32`                   |
//! | `Long`        | `unsigned int`   | `PixelBuffer::Long(Vec<u64>)`    | `i64`                   |
//! | `Float`       | `float`          | `PixelBuffer::Float(Vec<f32>)`   |                         |
//! | `Double`      | `double`         | `PixelBuffer::Double(Vec<f64>)`  |                         |
//!
//! Floating point samples are normalized to `0.0..=1.0`; integer samples are
//! scaled to the full range of their native type.
//!
//! The library transfers `Long` samples as 32-bit values, so they are widened
//! into `u64` on export and saturated to `u32::MAX` on import. Signed samples
//! are read as their unsigned bit pattern.

use std::any::Any;
use std::ffi::CString;
use std::os::raw::c_void;

use serde::{Deserialize, Serialize};

use imagick_sys as sys;

use crate::error::{Error, Result};
use crate::handle::Handle;

/// Element type of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    /// Import only: take the type from the buffer
    Undefined,
    Char,
    Short,
    Integer,
    Long,
    Float,
    Double,
}

impl StorageType {
    pub(crate) fn to_ffi(self) -> sys::StorageType {
        match self {
            StorageType::Undefined => sys::StorageType::UndefinedPixel,
            StorageType::Char => sys::StorageType::CharPixel,
            StorageType::Short => sys::StorageType::ShortPixel,
            StorageType::Integer => sys::StorageType::IntegerPixel,
            StorageType::Long => sys::StorageType::LongPixel,
            StorageType::Float => sys::StorageType::FloatPixel,
            StorageType::Double => sys::StorageType::DoublePixel,
        }
    }

    /// Bytes per native sample, `None` for `Undefined`
    pub fn sample_size(self) -> Option<usize> {
        match self {
            StorageType::Undefined => None,
            StorageType::Char => Some(1),
            StorageType::Short => Some(2),
            StorageType::Integer => Some(4),
            StorageType::Long => Some(4),
            StorageType::Float => Some(4),
            StorageType::Double => Some(8),
        }
    }
}

/// Validated channel map such as `"RGB"`, `"RGBA"`, `"R"` or `"GB"`
///
/// Each byte names one channel; order and repetition are up to the caller and
/// are interpreted by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    map: CString,
}

impl ChannelMap {
    pub fn new(map: &str) -> Result<Self> {
        if map.is_empty() {
            return Err(Error::invalid("channel map must not be empty"));
        }
        let map = CString::new(map)
            .map_err(|_| Error::invalid("channel map contains a NUL byte"))?;
        Ok(Self { map })
    }

    /// Samples per pixel
    pub fn channel_count(&self) -> usize {
        self.map.as_bytes().len()
    }

    pub fn as_str(&self) -> &str {
        // Built from a &str
        self.map.to_str().unwrap_or_default()
    }

    pub(crate) fn as_ptr(&self) -> *const std::os::raw::c_char {
        self.map.as_ptr()
    }
}

/// Rectangle of an image addressed by pixel transfers and region iterators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: isize,
    pub y: isize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: isize, y: isize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Region anchored at the origin
    pub fn whole(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    pub(crate) fn ensure_non_empty(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid(format!(
                "region must have positive width and height, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// `width * height * channels`
    pub fn sample_count(&self, map: &ChannelMap) -> Result<usize> {
        self.ensure_non_empty()?;
        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(map.channel_count()))
            .ok_or_else(|| {
                Error::invalid(format!(
                    "sample count overflows for {}x{} region with {} channels",
                    self.width,
                    self.height,
                    map.channel_count()
                ))
            })
    }
}

mod sealed {
    /// Borrowed samples tagged with their element type
    #[derive(Debug, Clone, Copy)]
    pub enum Samples<'a> {
        Char(&'a [u8]),
        Short(&'a [u16]),
        SignedShort(&'a [i16]),
        Integer(&'a [u32]),
        SignedInteger(&'a [i32]),
        Long(&'a [u64]),
        SignedLong(&'a [i64]),
        Float(&'a [f32]),
        Double(&'a [f64]),
    }

    pub trait Sealed: Sized {
        fn samples(slice: &[Self]) -> Samples<'_>;
    }
}

use sealed::Samples;

/// Element types accepted as import input
pub trait Sample: sealed::Sealed + Copy + 'static {
    const STORAGE: StorageType;
}

/// Element types a [`PixelBuffer`] can hold
pub trait Pixel: Sample + Default + Send + Sync {
    fn wrap(samples: Vec<Self>) -> PixelBuffer;

    fn view(buffer: &PixelBuffer) -> Option<&[Self]>;

    fn unwrap(buffer: PixelBuffer) -> std::result::Result<Vec<Self>, PixelBuffer>;
}

macro_rules! sample_types {
    ($($ty:ty => $storage:ident as $tag:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {
                fn samples(slice: &[Self]) -> Samples<'_> {
                    Samples::$tag(slice)
                }
            }

            impl Sample for $ty {
                const STORAGE: StorageType = StorageType::$storage;
            }
        )*
    };
}

sample_types! {
    u8 => Char as Char,
    u16 => Short as Short,
    i16 => Short as SignedShort,
    u32 => Integer as Integer,
    i32 => Integer as SignedInteger,
    u64 => Long as Long,
    i64 => Long as SignedLong,
    f32 => Float as Float,
    f64 => Double as Double,
}

macro_rules! pixel_types {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Pixel for $ty {
                fn wrap(samples: Vec<Self>) -> PixelBuffer {
                    PixelBuffer::$variant(samples)
                }

                fn view(buffer: &PixelBuffer) -> Option<&[Self]> {
                    match buffer {
                        PixelBuffer::$variant(samples) => Some(samples),
                        _ => None,
                    }
                }

                fn unwrap(buffer: PixelBuffer) -> std::result::Result<Vec<Self>, PixelBuffer> {
                    match buffer {
                        PixelBuffer::$variant(samples) => Ok(samples),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

pixel_types! {
    u8 => Char,
    u16 => Short,
    u32 => Integer,
    u64 => Long,
    f32 => Float,
    f64 => Double,
}

/// Samples of one of the supported storage types
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    Char(Vec<u8>),
    Short(Vec<u16>),
    Integer(Vec<u32>),
    Long(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl PixelBuffer {
    /// Zero-filled buffer of `len` samples
    pub fn zeroed(storage: StorageType, len: usize) -> Result<Self> {
        Ok(match storage {
            StorageType::Undefined => {
                return Err(Error::invalid("cannot allocate a buffer of undefined storage"))
            }
            StorageType::Char => PixelBuffer::Char(vec![0; len]),
            StorageType::Short => PixelBuffer::Short(vec![0; len]),
            StorageType::Integer => PixelBuffer::Integer(vec![0; len]),
            StorageType::Long => PixelBuffer::Long(vec![0; len]),
            StorageType::Float => PixelBuffer::Float(vec![0.0; len]),
            StorageType::Double => PixelBuffer::Double(vec![0.0; len]),
        })
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            PixelBuffer::Char(_) => StorageType::Char,
            PixelBuffer::Short(_) => StorageType::Short,
            PixelBuffer::Integer(_) => StorageType::Integer,
            PixelBuffer::Long(_) => StorageType::Long,
            PixelBuffer::Float(_) => StorageType::Float,
            PixelBuffer::Double(_) => StorageType::Double,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::Char(v) => v.len(),
            PixelBuffer::Short(v) => v.len(),
            PixelBuffer::Integer(v) => v.len(),
            PixelBuffer::Long(v) => v.len(),
            PixelBuffer::Float(v) => v.len(),
            PixelBuffer::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the samples if they are of type `T`
    pub fn as_slice<T: Pixel>(&self) -> Option<&[T]> {
        T::view(self)
    }

    /// Take the samples as `Vec<T>`
    pub fn into_vec<T: Pixel>(self) -> Result<Vec<T>> {
        T::unwrap(self).map_err(|buffer| {
            Error::UnsupportedPixelType(format!(
                "buffer holds {:?} samples, requested {:?}",
                buffer.storage_type(),
                T::STORAGE
            ))
        })
    }
}

impl<T: Pixel> From<Vec<T>> for PixelBuffer {
    fn from(samples: Vec<T>) -> Self {
        T::wrap(samples)
    }
}

impl Samples<'_> {
    fn storage_type(&self) -> StorageType {
        match self {
            Samples::Char(_) => StorageType::Char,
            Samples::Short(_) | Samples::SignedShort(_) => StorageType::Short,
            Samples::Integer(_) | Samples::SignedInteger(_) => StorageType::Integer,
            Samples::Long(_) | Samples::SignedLong(_) => StorageType::Long,
            Samples::Float(_) => StorageType::Float,
            Samples::Double(_) => StorageType::Double,
        }
    }

    fn len(&self) -> usize {
        match self {
            Samples::Char(v) => v.len(),
            Samples::Short(v) => v.len(),
            Samples::SignedShort(v) => v.len(),
            Samples::Integer(v) => v.len(),
            Samples::SignedInteger(v) => v.len(),
            Samples::Long(v) => v.len(),
            Samples::SignedLong(v) => v.len(),
            Samples::Float(v) => v.len(),
            Samples::Double(v) => v.len(),
        }
    }

    /// Pointer to the samples in native layout. 64-bit samples are narrowed
    /// into `scratch`, which must outlive the native call.
    fn native_ptr(&self, scratch: &mut Vec<u32>) -> *const c_void {
        match *self {
            Samples::Char(v) => v.as_ptr() as *const c_void,
            Samples::Short(v) => v.as_ptr() as *const c_void,
            Samples::SignedShort(v) => v.as_ptr() as *const c_void,
            Samples::Integer(v) => v.as_ptr() as *const c_void,
            Samples::SignedInteger(v) => v.as_ptr() as *const c_void,
            Samples::Long(v) => {
                *scratch = v.iter().map(|&s| narrow_long(s)).collect();
                scratch.as_ptr() as *const c_void
            }
            Samples::SignedLong(v) => {
                *scratch = v.iter().map(|&s| narrow_long(s as u64)).collect();
                scratch.as_ptr() as *const c_void
            }
            Samples::Float(v) => v.as_ptr() as *const c_void,
            Samples::Double(v) => v.as_ptr() as *const c_void,
        }
    }
}

fn narrow_long(sample: u64) -> u32 {
    u32::try_from(sample).unwrap_or(u32::MAX)
}

/// Borrowed samples ready to hand to the library
#[derive(Debug, Clone, Copy)]
pub struct RawPixels<'a> {
    samples: Samples<'a>,
}

impl<'a> RawPixels<'a> {
    fn from_slice<T: Sample>(samples: &'a [T]) -> Self {
        Self {
            samples: T::samples(samples),
        }
    }

    /// Resolve a dynamically typed value
    ///
    /// Accepts a [`PixelBuffer`], or a `Vec<T>` / `Box<[T]>` of any
    /// [`Sample`] type. Anything else is `UnsupportedPixelType`.
    pub fn from_any(value: &'a dyn Any) -> Result<Self> {
        if let Some(buffer) = value.downcast_ref::<PixelBuffer>() {
            return Ok(Self::from(buffer));
        }

        macro_rules! try_types {
            ($($ty:ty),*) => {
                $(
                    if let Some(samples) = value.downcast_ref::<Vec<$ty>>() {
                        return Ok(Self::from_slice(samples.as_slice()));
                    }
                    if let Some(samples) = value.downcast_ref::<Box<[$ty]>>() {
                        return Ok(Self::from_slice(&samples[..]));
                    }
                )*
            };
        }
        try_types!(u8, u16, i16, u32, i32, u64, i64, f32, f64);

        Err(Error::UnsupportedPixelType(
            "expected a PixelBuffer or a Vec of u8, u16, i16, u32, i32, u64, i64, f32 or f64"
                .into(),
        ))
    }

    pub fn storage_type(&self) -> StorageType {
        self.samples.storage_type()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a, T: Sample> From<&'a [T]> for RawPixels<'a> {
    fn from(samples: &'a [T]) -> Self {
        Self::from_slice(samples)
    }
}

impl<'a, T: Sample> From<&'a Vec<T>> for RawPixels<'a> {
    fn from(samples: &'a Vec<T>) -> Self {
        Self::from_slice(samples.as_slice())
    }
}

impl<'a> From<&'a PixelBuffer> for RawPixels<'a> {
    fn from(buffer: &'a PixelBuffer) -> Self {
        match buffer {
            PixelBuffer::Char(v) => Self::from_slice(v.as_slice()),
            PixelBuffer::Short(v) => Self::from_slice(v.as_slice()),
            PixelBuffer::Integer(v) => Self::from_slice(v.as_slice()),
            PixelBuffer::Long(v) => Self::from_slice(v.as_slice()),
            PixelBuffer::Float(v) => Self::from_slice(v.as_slice()),
            PixelBuffer::Double(v) => Self::from_slice(v.as_slice()),
        }
    }
}

/// Read `region` of the current image into a new buffer of `storage` samples
pub(crate) fn export(
    wand: &Handle<sys::MagickWand>,
    region: Region,
    map: &str,
    storage: StorageType,
) -> Result<PixelBuffer> {
    let ptr = wand.get()?;
    let map = ChannelMap::new(map)?;
    let len = region.sample_count(&map)?;

    let export_into = |data: *mut c_void| {
        let status = unsafe {
            sys::MagickExportImagePixels(
                ptr,
                region.x,
                region.y,
                region.width,
                region.height,
                map.as_ptr(),
                storage.to_ffi(),
                data,
            )
        };
        wand.check(status)
    };

    Ok(match storage {
        StorageType::Undefined => {
            return Err(Error::invalid("storage type must be defined for export"))
        }
        StorageType::Char => PixelBuffer::Char(filled(len, export_into)?),
        StorageType::Short => PixelBuffer::Short(filled(len, export_into)?),
        StorageType::Integer => PixelBuffer::Integer(filled(len, export_into)?),
        StorageType::Long => {
            let native: Vec<u32> = filled(len, export_into)?;
            PixelBuffer::Long(native.into_iter().map(u64::from).collect())
        }
        StorageType::Float => PixelBuffer::Float(filled(len, export_into)?),
        StorageType::Double => PixelBuffer::Double(filled(len, export_into)?),
    })
}

fn filled<T: Clone + Default>(
    len: usize,
    export_into: impl FnOnce(*mut c_void) -> Result<()>,
) -> Result<Vec<T>> {
    let mut samples = vec![T::default(); len];
    export_into(samples.as_mut_ptr() as *mut c_void)?;
    Ok(samples)
}

/// Write `pixels` into `region` of the current image
///
/// `StorageType::Undefined` takes the storage type from the buffer; any other
/// value must agree with it.
pub(crate) fn import(
    wand: &Handle<sys::MagickWand>,
    region: Region,
    map: &str,
    storage: StorageType,
    pixels: RawPixels<'_>,
) -> Result<()> {
    let ptr = wand.get()?;
    let map = ChannelMap::new(map)?;
    let expected = region.sample_count(&map)?;

    let storage = match storage {
        StorageType::Undefined => pixels.storage_type(),
        s if s == pixels.storage_type() => s,
        s => {
            return Err(Error::invalid(format!(
                "storage type {:?} does not match {:?} buffer",
                s,
                pixels.storage_type()
            )))
        }
    };

    if pixels.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut scratch = Vec::new();
    let data = pixels.samples.native_ptr(&mut scratch);
    let status = unsafe {
        sys::MagickImportImagePixels(
            ptr,
            region.x,
            region.y,
            region.width,
            region.height,
            map.as_ptr(),
            storage.to_ffi(),
            data,
        )
    };
    wand.check(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_map_counts() {
        assert_eq!(ChannelMap::new("RGB").unwrap().channel_count(), 3);
        assert_eq!(ChannelMap::new("RGBA").unwrap().channel_count(), 4);
        assert_eq!(ChannelMap::new("R").unwrap().channel_count(), 1);
        assert_eq!(ChannelMap::new("GB").unwrap().channel_count(), 2);
        // Repeats are forwarded as-is
        assert_eq!(ChannelMap::new("RRGG").unwrap().channel_count(), 4);
        assert_eq!(ChannelMap::new("BGR").unwrap().as_str(), "BGR");
    }

    #[test]
    fn test_channel_map_rejects_empty() {
        assert!(matches!(ChannelMap::new(""), Err(Error::InvalidInput(_))));
        assert!(matches!(ChannelMap::new("R\0G"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_region_sample_count() {
        let rgb = ChannelMap::new("RGB").unwrap();
        assert_eq!(Region::whole(640, 480).sample_count(&rgb).unwrap(), 640 * 480 * 3);
        assert_eq!(Region::new(10, 20, 5, 2).sample_count(&rgb).unwrap(), 30);
    }

    #[test]
    fn test_region_rejects_empty_and_overflow() {
        let rgb = ChannelMap::new("RGB").unwrap();
        assert!(matches!(
            Region::whole(0, 10).sample_count(&rgb),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Region::whole(10, 0).sample_count(&rgb),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Region::whole(usize::MAX, 2).sample_count(&rgb),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolution_is_total_over_supported_types() {
        let cases: Vec<(Box<dyn Any>, StorageType)> = vec![
            (Box::new(vec![0u8]), StorageType::Char),
            (Box::new(vec![0u16]), StorageType::Short),
            (Box::new(vec![0i16]), StorageType::Short),
            (Box::new(vec![0u32]), StorageType::Integer),
            (Box::new(vec![0i32]), StorageType::Integer),
            (Box::new(vec![0u64]), StorageType::Long),
            (Box::new(vec![0i64]), StorageType::Long),
            (Box::new(vec![0f32]), StorageType::Float),
            (Box::new(vec![0f64]), StorageType::Double),
        ];

        for (value, expected) in &cases {
            let raw = RawPixels::from_any(value.as_ref()).unwrap();
            assert_eq!(raw.storage_type(), *expected);
            assert_eq!(raw.len(), 1);
        }
    }

    #[test]
    fn test_resolution_rejects_other_types() {
        let scalar = 32i32;
        assert!(matches!(
            RawPixels::from_any(&scalar),
            Err(Error::UnsupportedPixelType(_))
        ));

        let narrow = vec![0i8; 4];
        assert!(matches!(
            RawPixels::from_any(&narrow),
            Err(Error::UnsupportedPixelType(_))
        ));

        let wide = vec![0u128; 4];
        assert!(RawPixels::from_any(&wide).is_err());

        let text = String::from("RGB");
        assert!(RawPixels::from_any(&text).is_err());
    }

    #[test]
    fn test_resolution_of_buffer_and_boxed_slice() {
        let buffer = PixelBuffer::Float(vec![0.5; 6]);
        let raw = RawPixels::from_any(&buffer).unwrap();
        assert_eq!(raw.storage_type(), StorageType::Float);
        assert_eq!(raw.len(), 6);

        let boxed: Box<[u16]> = vec![1, 2, 3].into_boxed_slice();
        let raw = RawPixels::from_any(&boxed).unwrap();
        assert_eq!(raw.storage_type(), StorageType::Short);
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_zeroed_buffers() {
        let buffer = PixelBuffer::zeroed(StorageType::Double, 12).unwrap();
        assert_eq!(buffer.storage_type(), StorageType::Double);
        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer.as_slice::<f64>(), Some(&[0.0; 12][..]));
        assert!(buffer.as_slice::<f32>().is_none());

        assert!(PixelBuffer::zeroed(StorageType::Undefined, 1).is_err());
    }

    #[test]
    fn test_into_vec() {
        let buffer = PixelBuffer::from(vec![1u32, 2, 3]);
        assert_eq!(buffer.storage_type(), StorageType::Integer);
        assert_eq!(buffer.clone().into_vec::<u32>().unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            buffer.into_vec::<u8>(),
            Err(Error::UnsupportedPixelType(_))
        ));
    }

    #[test]
    fn test_sample_sizes() {
        assert_eq!(StorageType::Char.sample_size(), Some(1));
        assert_eq!(StorageType::Short.sample_size(), Some(std::mem::size_of::<u16>()));
        // LongPixel travels as `unsigned int`
        assert_eq!(StorageType::Long.sample_size(), Some(std::mem::size_of::<u32>()));
        assert_eq!(StorageType::Undefined.sample_size(), None);
    }

    #[test]
    fn test_signed_slices_resolve_to_unsigned_storage() {
        let shorts = [-1i16, 0, 1];
        let raw = RawPixels::from(&shorts[..]);
        assert_eq!(raw.storage_type(), StorageType::Short);
        assert_eq!(raw.len(), 3);

        let ints = vec![7i32; 5];
        assert_eq!(RawPixels::from(&ints).storage_type(), StorageType::Integer);

        let longs = vec![7i64; 2];
        assert_eq!(RawPixels::from(&longs).storage_type(), StorageType::Long);
    }

    #[test]
    fn test_long_samples_are_narrowed() {
        let mut scratch = Vec::new();

        let unsigned = [0u64, 1, u32::MAX as u64, u32::MAX as u64 + 1, u64::MAX];
        let ptr = RawPixels::from(&unsigned[..]).samples.native_ptr(&mut scratch);
        assert_eq!(ptr, scratch.as_ptr() as *const c_void);
        assert_eq!(scratch, [0, 1, u32::MAX, u32::MAX, u32::MAX]);

        let signed = [-1i64, 0, 42];
        RawPixels::from(&signed[..]).samples.native_ptr(&mut scratch);
        assert_eq!(scratch, [u32::MAX, 0, 42]);

        let shorts = [1u16, 2];
        let ptr = RawPixels::from(&shorts[..]).samples.native_ptr(&mut scratch);
        assert_eq!(ptr, shorts.as_ptr() as *const c_void);
    }
}
