// Build script that tries to regenerate the C header with `cbindgen`.
// If `cbindgen` is not available, it falls back to copying the
// checked-in `include/flock.h` to $OUT_DIR.
//
// Either way, hosts can include the header from:
//   - <repo>/flock-ffi/include/flock.h      (checked-in)
//   - $OUT_DIR/flock.h (Cargo exposes via env at build time)

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    // Re-run build.rs if these change
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/flock.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let header_path_repo = crate_dir.join("include").join("flock.h");
    let header_path_out = out_dir.join("flock.h");

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let status = Command::new("cbindgen")
            .arg("--crate")
            .arg("flock-ffi")
            .arg("--lang")
            .arg("C")
            .arg("--output")
            .arg(&header_path_out)
            .current_dir(&crate_dir)
            .status();

        // Only the OUT_DIR copy is regenerated. The checked-in header carries
        // the LOWMEM switch, which cbindgen cannot express, so it is maintained by hand.
        if matches!(status, Ok(s) if s.success()) {
            println!("cargo:warning=flock-ffi: generated header with cbindgen -> {}", header_path_out.display());
            return;
        }
        println!("cargo:warning=flock-ffi: cbindgen failed; falling back to checked-in header");
    }

    fs::copy(&header_path_repo, &header_path_out).expect("failed to copy include/flock.h to OUT_DIR");
}
