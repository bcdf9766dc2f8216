//! Raw FFI bindings to the ImageMagick 6 MagickWand C API
//!
//! This crate provides unsafe bindings to the subset of `MagickWand/MagickWand.h`
//! used by the `imagick` crate. For a safe Rust API, use `imagick` instead.
//!
//! Every function returning `*mut c_char` or `*mut *mut c_char` hands ownership
//! to the caller, who must free it with [`MagickRelinquishMemory`]. Functions
//! returning `*const c_char` point into static library storage.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use std::os::raw::{c_char, c_double, c_int, c_uint, c_void};

pub use libc::{size_t, ssize_t};

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque image wand handle
#[repr(C)]
pub struct MagickWand {
    _private: [u8; 0],
}

/// Opaque drawing wand handle
#[repr(C)]
pub struct DrawingWand {
    _private: [u8; 0],
}

/// Opaque pixel wand handle
#[repr(C)]
pub struct PixelWand {
    _private: [u8; 0],
}

/// Opaque pixel iterator handle
#[repr(C)]
pub struct PixelIterator {
    _private: [u8; 0],
}

// =============================================================================
// Scalar Aliases
// =============================================================================

/// `MagickBooleanType` is a C enum of `MagickFalse`/`MagickTrue`
pub type MagickBooleanType = c_uint;

pub const MagickFalse: MagickBooleanType = 0;
pub const MagickTrue: MagickBooleanType = 1;

/// `MagickSizeType` is `unsigned long long` in every 6.x build
pub type MagickSizeType = u64;

/// `ExceptionType` is kept as a plain integer: the library reports codes
/// outside any closed set we could mirror as a Rust enum.
pub type ExceptionType = c_int;

pub const UndefinedException: ExceptionType = 0;
pub const WarningException: ExceptionType = 300;
pub const ErrorException: ExceptionType = 400;
pub const FatalErrorException: ExceptionType = 700;

// =============================================================================
// Enums passed into the library
// =============================================================================

/// Storage type of a pixel sample buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    UndefinedPixel = 0,
    CharPixel = 1,
    DoublePixel = 2,
    FloatPixel = 3,
    IntegerPixel = 4,
    LongPixel = 5,
    QuantumPixel = 6,
    ShortPixel = 7,
}

/// Resource kinds accepted by `MagickSetResourceLimit`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    UndefinedResource = 0,
    AreaResource = 1,
    DiskResource = 2,
    FileResource = 3,
    MapResource = 4,
    MemoryResource = 5,
    ThreadResource = 6,
    TimeResource = 7,
    ThrottleResource = 8,
    WidthResource = 9,
    HeightResource = 10,
    ListLengthResource = 11,
}

// =============================================================================
// External Functions
// =============================================================================

extern "C" {
    // =========================================================================
    // Environment
    // =========================================================================

    /// Initialize the MagickWand environment
    pub fn MagickWandGenesis();

    /// Tear down the MagickWand environment
    pub fn MagickWandTerminus();

    /// Check whether genesis has run
    pub fn IsMagickWandInstantiated() -> MagickBooleanType;

    /// Free memory returned by the library
    pub fn MagickRelinquishMemory(resource: *mut c_void) -> *mut c_void;

    /// Library version string (static) and numeric version
    pub fn MagickGetVersion(version: *mut size_t) -> *const c_char;

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn MagickSetResourceLimit(
        resource: ResourceType,
        limit: MagickSizeType,
    ) -> MagickBooleanType;

    pub fn MagickGetResourceLimit(resource: ResourceType) -> MagickSizeType;

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn MagickQueryConfigureOptions(
        pattern: *const c_char,
        number_options: *mut size_t,
    ) -> *mut *mut c_char;

    pub fn MagickQueryConfigureOption(option: *const c_char) -> *mut c_char;

    pub fn MagickQueryFonts(pattern: *const c_char, number_fonts: *mut size_t)
        -> *mut *mut c_char;

    pub fn MagickQueryFormats(
        pattern: *const c_char,
        number_formats: *mut size_t,
    ) -> *mut *mut c_char;

    /// Quantum depth name (static), e.g. "Q16"
    pub fn MagickGetQuantumDepth(depth: *mut size_t) -> *const c_char;

    /// Quantum range name (static), e.g. "65535"
    pub fn MagickGetQuantumRange(range: *mut size_t) -> *const c_char;

    // =========================================================================
    // MagickWand Lifecycle
    // =========================================================================

    pub fn NewMagickWand() -> *mut MagickWand;
    pub fn CloneMagickWand(wand: *const MagickWand) -> *mut MagickWand;
    pub fn DestroyMagickWand(wand: *mut MagickWand) -> *mut MagickWand;
    pub fn IsMagickWand(wand: *const MagickWand) -> MagickBooleanType;
    pub fn ClearMagickWand(wand: *mut MagickWand);

    pub fn MagickGetException(
        wand: *const MagickWand,
        severity: *mut ExceptionType,
    ) -> *mut c_char;
    pub fn MagickClearException(wand: *mut MagickWand) -> MagickBooleanType;

    // =========================================================================
    // MagickWand Image I/O
    // =========================================================================

    pub fn MagickReadImage(wand: *mut MagickWand, filename: *const c_char) -> MagickBooleanType;

    pub fn MagickReadImageBlob(
        wand: *mut MagickWand,
        blob: *const c_void,
        length: size_t,
    ) -> MagickBooleanType;

    /// Encoded image bytes; free with `MagickRelinquishMemory`
    pub fn MagickGetImageBlob(wand: *mut MagickWand, length: *mut size_t) -> *mut u8;

    pub fn MagickNewImage(
        wand: *mut MagickWand,
        columns: size_t,
        rows: size_t,
        background: *const PixelWand,
    ) -> MagickBooleanType;

    // =========================================================================
    // MagickWand Image Properties
    // =========================================================================

    pub fn MagickGetImageWidth(wand: *mut MagickWand) -> size_t;
    pub fn MagickGetImageHeight(wand: *mut MagickWand) -> size_t;
    pub fn MagickGetNumberImages(wand: *mut MagickWand) -> size_t;

    pub fn MagickGetImageFormat(wand: *mut MagickWand) -> *mut c_char;
    pub fn MagickSetImageFormat(wand: *mut MagickWand, format: *const c_char)
        -> MagickBooleanType;

    pub fn MagickScaleImage(wand: *mut MagickWand, columns: size_t, rows: size_t)
        -> MagickBooleanType;

    pub fn MagickDrawImage(wand: *mut MagickWand, drawing: *const DrawingWand)
        -> MagickBooleanType;

    // =========================================================================
    // MagickWand Artifacts
    // =========================================================================

    pub fn MagickSetImageArtifact(
        wand: *mut MagickWand,
        artifact: *const c_char,
        value: *const c_char,
    ) -> MagickBooleanType;

    pub fn MagickGetImageArtifact(wand: *mut MagickWand, artifact: *const c_char) -> *mut c_char;

    pub fn MagickGetImageArtifacts(
        wand: *mut MagickWand,
        pattern: *const c_char,
        number_artifacts: *mut size_t,
    ) -> *mut *mut c_char;

    pub fn MagickDeleteImageArtifact(
        wand: *mut MagickWand,
        artifact: *const c_char,
    ) -> MagickBooleanType;

    // =========================================================================
    // MagickWand Pixel Transfer
    // =========================================================================

    pub fn MagickExportImagePixels(
        wand: *mut MagickWand,
        x: ssize_t,
        y: ssize_t,
        columns: size_t,
        rows: size_t,
        map: *const c_char,
        storage: StorageType,
        pixels: *mut c_void,
    ) -> MagickBooleanType;

    pub fn MagickImportImagePixels(
        wand: *mut MagickWand,
        x: ssize_t,
        y: ssize_t,
        columns: size_t,
        rows: size_t,
        map: *const c_char,
        storage: StorageType,
        pixels: *const c_void,
    ) -> MagickBooleanType;

    // =========================================================================
    // DrawingWand
    // =========================================================================

    pub fn NewDrawingWand() -> *mut DrawingWand;
    pub fn CloneDrawingWand(wand: *const DrawingWand) -> *mut DrawingWand;
    pub fn DestroyDrawingWand(wand: *mut DrawingWand) -> *mut DrawingWand;
    pub fn IsDrawingWand(wand: *const DrawingWand) -> MagickBooleanType;
    pub fn ClearDrawingWand(wand: *mut DrawingWand);

    pub fn DrawGetException(
        wand: *const DrawingWand,
        severity: *mut ExceptionType,
    ) -> *mut c_char;
    pub fn DrawClearException(wand: *mut DrawingWand) -> MagickBooleanType;

    pub fn DrawSetFillColor(wand: *mut DrawingWand, fill: *const PixelWand);
    pub fn DrawSetStrokeColor(wand: *mut DrawingWand, stroke: *const PixelWand);
    pub fn DrawSetStrokeWidth(wand: *mut DrawingWand, width: c_double);
    pub fn DrawGetStrokeWidth(wand: *const DrawingWand) -> c_double;
    pub fn DrawSetFontSize(wand: *mut DrawingWand, pointsize: c_double);
    pub fn DrawGetFontSize(wand: *const DrawingWand) -> c_double;

    pub fn DrawRectangle(
        wand: *mut DrawingWand,
        x1: c_double,
        y1: c_double,
        x2: c_double,
        y2: c_double,
    );
    pub fn DrawLine(wand: *mut DrawingWand, sx: c_double, sy: c_double, ex: c_double, ey: c_double);
    pub fn DrawCircle(wand: *mut DrawingWand, ox: c_double, oy: c_double, px: c_double, py: c_double);

    // =========================================================================
    // PixelWand
    // =========================================================================

    pub fn NewPixelWand() -> *mut PixelWand;
    pub fn ClonePixelWand(wand: *const PixelWand) -> *mut PixelWand;
    pub fn DestroyPixelWand(wand: *mut PixelWand) -> *mut PixelWand;
    pub fn IsPixelWand(wand: *const PixelWand) -> MagickBooleanType;
    pub fn ClearPixelWand(wand: *mut PixelWand);

    pub fn PixelGetException(wand: *const PixelWand, severity: *mut ExceptionType) -> *mut c_char;
    pub fn PixelClearException(wand: *mut PixelWand) -> MagickBooleanType;

    pub fn PixelSetColor(wand: *mut PixelWand, color: *const c_char) -> MagickBooleanType;
    pub fn PixelGetColorAsString(wand: *const PixelWand) -> *mut c_char;
    pub fn PixelGetColorAsNormalizedString(wand: *const PixelWand) -> *mut c_char;

    pub fn PixelGetRed(wand: *const PixelWand) -> c_double;
    pub fn PixelGetGreen(wand: *const PixelWand) -> c_double;
    pub fn PixelGetBlue(wand: *const PixelWand) -> c_double;
    pub fn PixelGetAlpha(wand: *const PixelWand) -> c_double;
    pub fn PixelSetRed(wand: *mut PixelWand, red: c_double);
    pub fn PixelSetGreen(wand: *mut PixelWand, green: c_double);
    pub fn PixelSetBlue(wand: *mut PixelWand, blue: c_double);
    pub fn PixelSetAlpha(wand: *mut PixelWand, alpha: c_double);

    pub fn IsPixelWandSimilar(
        p: *mut PixelWand,
        q: *mut PixelWand,
        fuzz: c_double,
    ) -> MagickBooleanType;

    // =========================================================================
    // PixelIterator
    // =========================================================================

    pub fn NewPixelIterator(wand: *mut MagickWand) -> *mut PixelIterator;
    pub fn NewPixelRegionIterator(
        wand: *mut MagickWand,
        x: ssize_t,
        y: ssize_t,
        width: size_t,
        height: size_t,
    ) -> *mut PixelIterator;
    pub fn ClonePixelIterator(iterator: *const PixelIterator) -> *mut PixelIterator;
    pub fn DestroyPixelIterator(iterator: *mut PixelIterator) -> *mut PixelIterator;
    pub fn IsPixelIterator(iterator: *const PixelIterator) -> MagickBooleanType;
    pub fn ClearPixelIterator(iterator: *mut PixelIterator);

    pub fn PixelGetIteratorException(
        iterator: *const PixelIterator,
        severity: *mut ExceptionType,
    ) -> *mut c_char;
    pub fn PixelClearIteratorException(iterator: *mut PixelIterator) -> MagickBooleanType;

    /// Row wands are owned by the iterator and must not be destroyed
    pub fn PixelGetNextIteratorRow(
        iterator: *mut PixelIterator,
        number_wands: *mut size_t,
    ) -> *mut *mut PixelWand;
    pub fn PixelGetCurrentIteratorRow(
        iterator: *mut PixelIterator,
        number_wands: *mut size_t,
    ) -> *mut *mut PixelWand;
    pub fn PixelGetIteratorRow(iterator: *mut PixelIterator) -> ssize_t;
    pub fn PixelSetIteratorRow(iterator: *mut PixelIterator, row: ssize_t) -> MagickBooleanType;
    pub fn PixelResetIterator(iterator: *mut PixelIterator);
    pub fn PixelSyncIterator(iterator: *mut PixelIterator) -> MagickBooleanType;
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert a `MagickBooleanType` to `bool`
#[inline]
pub fn is_true(value: MagickBooleanType) -> bool {
    value != MagickFalse
}
