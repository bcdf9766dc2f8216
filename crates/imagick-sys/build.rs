use std::path::Path;

const DEFAULT_LIBS: &[&str] = &["MagickWand-6.Q16", "MagickCore-6.Q16"];

fn main() {
    println!("cargo:rerun-if-env-changed=IMAGICK_LIB_DIR");
    println!("cargo:rerun-if-env-changed=IMAGICK_LIBS");

    // Priority 1: explicit library directory (CI, custom prefix)
    if let Ok(lib_dir) = std::env::var("IMAGICK_LIB_DIR") {
        for dir in std::env::split_paths(&lib_dir) {
            println!("cargo:rustc-link-search=native={}", dir.display());
        }
    }
    // Priority 2: Homebrew / local prefix
    else if Path::new("/usr/local/lib").exists() {
        println!("cargo:rustc-link-search=native=/usr/local/lib");
    }
    // Priority 3: distro multiarch directories are searched by the linker already

    // Library names can be overridden for HDRI or Q8 builds,
    // e.g. IMAGICK_LIBS="MagickWand-6.Q16HDRI,MagickCore-6.Q16HDRI"
    let libs: Vec<String> = match std::env::var("IMAGICK_LIBS") {
        Ok(names) => names
            .split(|c| c == ',' || c == ':')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => DEFAULT_LIBS.iter().map(|name| name.to_string()).collect(),
    };

    for lib in &libs {
        println!("cargo:rustc-link-lib=dylib={}", lib);
    }
}
