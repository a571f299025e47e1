//! Lets CI machines without a GPU opt out of the tests that need one.
//!
//! Set `GRADIENT_CI_GPU_SUPPORT=no` to compile those tests as `#[ignore]`d.

use std::env;

const GPU_SUPPORT_VAR: &str = "GRADIENT_CI_GPU_SUPPORT";

/// `None` when the variable is unset, so the tests run and skip themselves if no adapter exists.
fn gpu_support() -> Option<Result<bool, String>> {
    let value = env::var(GPU_SUPPORT_VAR).ok()?;
    Some(match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        _ => Err(value),
    })
}

fn main() {
    println!("cargo:rerun-if-env-changed={GPU_SUPPORT_VAR}");
    println!("cargo:rustc-check-cfg=cfg(skip_gpu_tests)");

    match gpu_support() {
        Some(Ok(false)) => println!("cargo:rustc-cfg=skip_gpu_tests"),
        Some(Err(value)) => {
            println!("cargo:warning=ignoring {GPU_SUPPORT_VAR}={value:?}, expected yes or no");
        }
        Some(Ok(true)) | None => {}
    }
}
