use std::env;

fn main() {
    // Host builds (unit tests) link against std and need none of the firmware linker scripts
    let target = env::var("TARGET").unwrap();
    if !target.starts_with("thumb") {
        return;
    }

    // Set linker flags for all binaries
    println!("cargo:rustc-link-arg-bins=--nmagic");

    // Main linker script, `memory.x` is generated by embassy-stm32's `memory-x` feature
    println!("cargo:rustc-link-arg-bins=-Tlink.x");

    // Only link defmt if the feature is enabled
    #[cfg(feature = "debug")]
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
