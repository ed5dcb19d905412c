//! This build script embeds the timer configuration and, for the embedded target,
//! copies the `memory.x` file from the crate root into a directory where the
//! linker can always find it at build time.
//! Cargo re-runs the script whenever `memory.x` or the configuration changes.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
};

fn main() {
    timer_config().unwrap();
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        memory_x();
    }
}

/// Generate `timer_config.rs` from `config/timer_config.json`
fn timer_config() -> io::Result<()> {
    // Create a new file in the output directory
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    let dest_path = Path::new(&out_dir).join("timer_config.rs");
    let mut f = File::create(dest_path).expect("Could not create timer_config.rs file");

    // Read the timer_config.json file; without one every setting keeps its default
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_path = Path::new(&manifest_dir).join("config/timer_config.json");
    println!("cargo:rerun-if-changed={}", config_path.display());
    let config_contents = if config_path.exists() {
        fs::read_to_string(&config_path).expect("Could not read timer_config.json file")
    } else {
        println!("timer_config.json not found, using the built-in defaults");
        "{}".to_string()
    };

    // Only check the syntax here, the firmware validates the values at startup
    let config: serde_json::Value =
        serde_json::from_str(&config_contents).expect("Could not parse timer_config.json file");
    assert!(config.is_object(), "timer_config.json must contain a JSON object");

    // Write the compact JSON as a string constant
    let compact = serde_json::to_string(&config).expect("Could not serialize timer configuration");
    writeln!(f, "/// Timer configuration overrides, embedded at build time")?;
    writeln!(f, "pub const TIMER_CONFIG_JSON: &str = {compact:?};")?;
    Ok(())
}

/// Handle the `memory.x` linker script
fn memory_x() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // By specifying `memory.x` here, we ensure the build script is only
    // re-run when `memory.x` is changed.
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
