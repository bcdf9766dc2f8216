//! Library-wide queries and configuration

mod common;

use imagick::{query, Config, Error, Resource};

#[test]
fn test_query_configure_options() {
    let _session = common::session();

    let opts = query::query_configure_options("*").unwrap();
    assert!(!opts.is_empty(), "expected at least one configure option");

    for name in opts.iter().take(5) {
        query::query_configure_option(name).unwrap();
    }
}

#[test]
fn test_nonexistent_configure_option() {
    let _session = common::session();

    let err = query::query_configure_option("4321foobaramps1234").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "{err}");
    assert!(query::query_configure_options("4321foobaramps*")
        .unwrap()
        .is_empty());
}

#[test]
fn test_query_fonts_and_formats() {
    let _session = common::session();

    // font lists depend on the host, only the call itself must succeed
    query::query_fonts("*").unwrap();

    let formats = query::query_formats("*").unwrap();
    assert!(!formats.is_empty());
    assert!(formats.iter().any(|f| f == "GIF"), "{formats:?}");

    assert_eq!(query::query_formats("BM?").unwrap(), ["BMP"]);
    assert!(matches!(
        query::query_formats("a\0b"),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_quantum_depth_and_range() {
    let _session = common::session();

    let (name, depth) = query::quantum_depth().unwrap();
    assert!(depth == 8 || depth == 16, "{name} {depth}");
    assert!(name.contains(&depth.to_string()), "{name}");

    let (name, range) = query::quantum_range().unwrap();
    assert_eq!(range, (1usize << depth) - 1, "{name}");
}

#[test]
fn test_version() {
    let _session = common::session();

    let (name, number) = query::version().unwrap();
    assert!(name.starts_with("ImageMagick"), "{name}");
    assert!(number >= 0x600, "{number:#x}");
}

#[test]
fn test_resource_limits() {
    let _session = common::session();

    let original = query::resource_limit(Resource::Throttle).unwrap();
    query::set_resource_limit(Resource::Throttle, 0).unwrap();
    assert_eq!(query::resource_limit(Resource::Throttle).unwrap(), 0);
    query::set_resource_limit(Resource::Throttle, original).unwrap();
}

#[test]
fn test_config_from_json() {
    let config: Config =
        serde_json::from_str(r#"{"limits": {"thread": 2, "list_length": 64}}"#).unwrap();
    assert_eq!(
        config,
        Config::new()
            .with_limit(Resource::Thread, 2)
            .with_limit(Resource::ListLength, 64)
    );

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["limits"]["thread"], 2);
    assert!(json["limits"]["disk"].is_null());

    let empty: Config = serde_json::from_str("{}").unwrap();
    assert!(empty.limits.is_empty());
}
