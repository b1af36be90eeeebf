use std::process::Command;

fn main() {
    // CI injects the hash explicitly; fall back to the local checkout
    let git_hash = std::env::var("GIT_COMMIT_HASH")
        .ok()
        .filter(|hash| !hash.trim().is_empty())
        .or_else(get_git_hash)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PIPELINE_GIT_COMMIT_HASH={git_hash}");

    println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/heads/");
}

fn get_git_hash() -> Option<String> {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
}
