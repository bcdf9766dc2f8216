//! Engine start-up and teardown
//!
//! Kept in its own binary: these tests drive the native environment through
//! genesis and terminus, which the other test binaries avoid.

mod common;

use imagick::{engine, query, registry, Config, Error, ImageWand, PixelWand, Resource, WandKind};

#[test]
fn test_wand_requires_engine() {
    let _lock = common::serial();
    assert_eq!(engine::ref_count(), 0);

    assert!(matches!(ImageWand::new(), Err(Error::EngineNotInitialized)));
    assert!(matches!(PixelWand::new(), Err(Error::EngineNotInitialized)));
    assert!(matches!(query::query_formats("*"), Err(Error::EngineNotInitialized)));
    assert_eq!(
        query::quantum_depth().unwrap_err().to_string(),
        "ImageMagick engine is not initialized"
    );

    // failed allocations leave no trace
    common::assert_clean();

    // unmatched terminate is ignored
    imagick::terminate();
    assert_eq!(engine::ref_count(), 0);
}

#[test]
fn test_engine_lifecycle() {
    let _lock = common::serial();
    assert!(!engine::is_initialized());

    let config = Config::new().with_limit(Resource::Thread, 1);
    imagick::initialize_with(config);
    imagick::initialize();
    assert!(engine::is_initialized());
    assert_eq!(engine::ref_count(), 2);
    assert_eq!(query::resource_limit(Resource::Thread).unwrap(), 1);

    imagick::terminate();
    assert!(engine::is_initialized(), "one reference is still held");

    let mut survivor = ImageWand::new().unwrap();
    survivor.read_image("logo:").unwrap();

    imagick::terminate();
    assert_eq!(engine::ref_count(), 0);
    assert!(
        engine::is_initialized(),
        "a live wand keeps the engine running"
    );

    // still usable after the last terminate
    assert_eq!(survivor.width().unwrap(), 640);
    assert!(matches!(ImageWand::new(), Err(Error::EngineNotInitialized)));

    survivor.destroy();
    assert_eq!(registry::count(WandKind::Image), 0);
    assert!(!engine::is_initialized(), "released wand lets teardown finish");
    common::assert_clean();
}
