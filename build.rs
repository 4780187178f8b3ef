use std::process::Command;
use vergen::EmitBuilder;

fn main() {
    let in_git_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();

    if in_git_checkout {
        builder.git_sha(true);
    } else {
        // The version endpoint reads VERGEN_GIT_SHA via env!, so it must always be set.
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
    }

    builder.emit().expect("Unable to generate build metadata");
}
