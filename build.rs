fn main() {
    // ── libvips linking ──────────────────────────────────────────────────────
    //
    // Only needed for the `vips` feature. The libvips-rs bindings crate ships
    // no build script of its own, so we tell cargo where to find the library.
    //
    // The VIPS_DIR environment variable points at a libvips install whose
    // `lib/` directory should be searched first (Windows / macOS dev setups).
    if std::env::var_os("CARGO_FEATURE_VIPS").is_some() {
        link_libvips();
    }
}

fn link_libvips() {
    // Re-run whenever the override env-var changes.
    println!("cargo:rerun-if-env-changed=VIPS_DIR");

    if let Ok(vips_dir) = std::env::var("VIPS_DIR") {
        let lib_dir = std::path::Path::new(&vips_dir).join("lib");
        if lib_dir.exists() {
            println!("cargo:rustc-link-search=native={}", lib_dir.display());
        } else {
            println!("cargo:warning=VIPS_DIR is set but '{}' does not exist", lib_dir.display());
        }
    }

    if cfg!(target_os = "windows") {
        // GLib symbols (g_free, g_object_unref, …) called directly by
        // libvips_rs's image.rs must also be explicitly linked.
        println!("cargo:rustc-link-lib=dylib=libvips");
        println!("cargo:rustc-link-lib=dylib=libglib-2.0");
        println!("cargo:rustc-link-lib=dylib=libgobject-2.0");
    } else {
        // Linux / macOS: the system libvips package (with libheif) is sufficient.
        println!("cargo:rustc-link-lib=dylib=vips");
        println!("cargo:rustc-link-lib=dylib=glib-2.0");
        println!("cargo:rustc-link-lib=dylib=gobject-2.0");
    }
}
