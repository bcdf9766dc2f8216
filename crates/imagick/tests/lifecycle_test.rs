//! Handle lifecycle and live-object accounting

mod common;

use std::thread;

use imagick::{registry, DrawingWand, Error, ImageWand, PixelWand, WandKind};

#[test]
fn test_new_magick_wand() {
    let _session = common::session();
    {
        let mw = ImageWand::new().unwrap();
        assert!(mw.is_verified(), "ImageWand not verified");
        assert!(!mw.is_destroyed());
        assert_eq!(registry::count(WandKind::Image), 1);
    }
    common::assert_clean();
}

#[test]
fn test_every_kind_is_counted() {
    let _session = common::session();
    {
        let mw = common::logo();
        let _dw = DrawingWand::new().unwrap();
        let _pw = PixelWand::new().unwrap();
        let _pi = mw.pixel_iterator().unwrap();

        let snapshot = registry::snapshot();
        for kind in WandKind::ALL {
            assert_eq!(snapshot.get(kind), 1, "{kind} counter");
        }
        assert_eq!(registry::total(), 4);
        assert!(!snapshot.is_clean());
    }
    common::assert_clean();
}

#[test]
fn test_clone_is_independent() {
    let _session = common::session();
    {
        let mut original = common::logo();
        let mut copy = original.try_clone().unwrap();
        assert_eq!(registry::count(WandKind::Image), 2);

        original.destroy();
        assert_eq!(copy.width().unwrap(), 640);
        assert!(copy.is_verified());

        copy.scale_image(64, 48).unwrap();
        copy.destroy();
        assert_eq!(registry::count(WandKind::Image), 0);
    }
    {
        let original = common::logo();
        let mut copy = original.try_clone().unwrap();
        copy.destroy();
        assert_eq!(original.width().unwrap(), 640);
        assert_eq!(original.height().unwrap(), 480);
    }
    common::assert_clean();
}

#[test]
fn test_destroy_is_idempotent() {
    let _session = common::session();
    {
        let mut mw = ImageWand::new().unwrap();
        mw.destroy();
        mw.destroy();
        assert!(mw.is_destroyed());
        assert!(!mw.is_verified());
        assert_eq!(registry::count(WandKind::Image), 0);

        let mut pw = PixelWand::new().unwrap();
        pw.destroy();
        pw.destroy();
        assert_eq!(registry::count(WandKind::Pixel), 0);
    }
    // the destroyed wands are dropped here without a second decrement
    assert_eq!(registry::count(WandKind::Image), 0);
    common::assert_clean();
}

#[test]
fn test_use_after_destroy() {
    let _session = common::session();
    {
        let mut mw = common::logo();
        mw.destroy();

        assert_eq!(mw.width(), Err(Error::ObjectDestroyed(WandKind::Image)));
        assert_eq!(mw.read_image("logo:"), Err(Error::ObjectDestroyed(WandKind::Image)));
        assert!(matches!(mw.try_clone(), Err(Error::ObjectDestroyed(_))));
        assert!(matches!(mw.pixel_iterator(), Err(Error::ObjectDestroyed(_))));

        let mut dw = DrawingWand::new().unwrap();
        dw.destroy();
        assert_eq!(
            dw.rectangle(0.0, 0.0, 1.0, 1.0),
            Err(Error::ObjectDestroyed(WandKind::Drawing))
        );

        let err = mw.clear().unwrap_err();
        assert_eq!(err.to_string(), "MagickWand was already destroyed");
    }
    common::assert_clean();
}

#[test]
fn test_destroyed_argument_is_rejected() {
    let _session = common::session();
    {
        let mut mw = ImageWand::new().unwrap();
        let mut bg = PixelWand::with_color("white").unwrap();
        bg.destroy();

        assert_eq!(
            mw.new_image(10, 10, &bg),
            Err(Error::ObjectDestroyed(WandKind::Pixel))
        );
    }
    common::assert_clean();
}

#[test]
fn test_clear_keeps_handle() {
    let _session = common::session();
    {
        let mut mw = common::logo();
        mw.clear().unwrap();
        assert!(mw.is_verified());
        assert_eq!(mw.number_images().unwrap(), 0);
        assert_eq!(registry::count(WandKind::Image), 1);
    }
    common::assert_clean();
}

#[test]
fn test_nested_initialize() {
    let _session = common::session();
    let before = imagick::engine::ref_count();

    imagick::initialize();
    imagick::initialize();
    assert_eq!(imagick::engine::ref_count(), before + 2);

    imagick::terminate();
    imagick::terminate();
    assert_eq!(imagick::engine::ref_count(), before);
    assert!(imagick::engine::is_initialized());
}

#[test]
fn test_wands_move_across_threads() {
    let _session = common::session();
    {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                thread::spawn(move || {
                    let mut mw = ImageWand::new().unwrap();
                    let bg = PixelWand::with_color("red").unwrap();
                    mw.new_image(8 + i, 8, &bg).unwrap();
                    mw
                })
            })
            .collect();

        let wands: Vec<ImageWand> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(registry::count(WandKind::Image), 4);
        for (i, mw) in wands.iter().enumerate() {
            assert_eq!(mw.width().unwrap(), 8 + i);
        }
    }
    common::assert_clean();
}

#[test]
fn test_concurrent_initialize_terminate() {
    let _session = common::session();
    let before = imagick::engine::ref_count();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..50 {
                    imagick::initialize();
                    let pw = PixelWand::with_color("blue").unwrap();
                    assert!(pw.is_verified());
                    drop(pw);
                    imagick::terminate();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(imagick::engine::ref_count(), before);
    common::assert_clean();
}
