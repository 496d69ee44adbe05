//! Build script for symbolizer-core
//!
//! - Enforces the minimum supported Rust version
//! - Exports the compilation target to the crate as `SYMBOLIZER_TARGET_ARCH`
//!   and `SYMBOLIZER_TARGET_SYSTEM`, read by `version::Target`

use std::env;

const MIN_RUST_VERSION: &str = "1.70.0";

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(rustc_version) = rustc_version::version() {
        match rustc_version::Version::parse(MIN_RUST_VERSION) {
            Ok(min_rust_version) if rustc_version < min_rust_version => {
                panic!("symbolizer-core requires Rust {min_rust_version} or newer, found {rustc_version}");
            }
            Ok(_) => {}
            Err(err) => println!("cargo:warning=invalid minimum Rust version {MIN_RUST_VERSION}: {err}"),
        }
    } else {
        // If we can't get version (e.g., in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    let system = env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=SYMBOLIZER_TARGET_ARCH={arch}");
    println!("cargo:rustc-env=SYMBOLIZER_TARGET_SYSTEM={system}");
}
