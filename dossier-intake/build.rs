//! Build script for dossier-intake
//!
//! Embeds build identification (git revision, timestamp, profile) so the
//! binary can log exactly which build produced a report.

use std::process::Command;

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}

fn main() {
    let revision = git_revision().unwrap_or_else(|| "unknown".to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=DOSSIER_GIT_REVISION={}", revision);
    println!("cargo:rustc-env=DOSSIER_BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=DOSSIER_BUILD_PROFILE={}", profile);
}
