//! Link directives for the static Tcl/Tk runtime and extension archives.
//! Only active with the `tk` feature; a plain build links nothing.

const DEFAULT_LINK_LIBS: &[&str] = &[
    "tkblt",
    "Tktable",
    "tls",
    "tksao",
    "tkhtml1",
    "tclxpa",
    "tclfitsy",
    "tkmpeg",
    "tksvg",
    "tkagif",
    "tclxml",
    "tclxmlrpc",
    "tkimgwindow",
    "tkimgtiff",
    "tifftcl",
    "tkimgjpeg",
    "jpegtcl",
    "zlibtcl",
    "tkimg",
    "signal_ext",
    "tk8.6",
    "tcl8.6",
];

fn main() {
    println!("cargo:rerun-if-env-changed=DS9_LIB_DIR");
    println!("cargo:rerun-if-env-changed=DS9_LINK_LIBS");

    if std::env::var_os("CARGO_FEATURE_TK").is_none() {
        return;
    }

    if let Ok(dir) = std::env::var("DS9_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }

    let libs: Vec<String> = match std::env::var("DS9_LINK_LIBS") {
        Ok(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => DEFAULT_LINK_LIBS.iter().map(|s| s.to_string()).collect(),
    };
    // Order matters for static archives: extensions before tk, tk before tcl.
    for lib in libs {
        println!("cargo:rustc-link-lib={lib}");
    }
}
