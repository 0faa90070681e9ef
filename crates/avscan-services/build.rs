//! Stamps the build date used as the fallback "updated" value.

fn main() {
    println!("cargo:rerun-if-env-changed=BUILD_TIME");

    let build_time = std::env::var("BUILD_TIME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| chrono::Utc::now().format("%Y%m%d").to_string());

    println!("cargo:rustc-env=AVSCAN_BUILD_TIME={}", build_time);
}
