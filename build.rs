use std::env;
use std::path::PathBuf;

// ffmpeg-sys-next finds FFmpeg through pkg-config on Unix. On Windows it
// needs FFMPEG_DIR, which people usually point at a vcpkg install; nudge them
// towards it instead of letting the link step fail with a cryptic message.
fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set; install FFmpeg (e.g. `vcpkg install ffmpeg`) and point FFMPEG_DIR at it"
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = PathBuf::from(vcpkg_root).join("installed").join(triplet);
    if candidate.exists() {
        println!(
            "cargo:warning=Found FFmpeg under vcpkg; set FFMPEG_DIR={} to use it",
            candidate.display()
        );
    } else {
        println!(
            "cargo:warning=No FFmpeg found under {}; set FFMPEG_DIR to your FFmpeg install",
            candidate.display()
        );
    }
}
