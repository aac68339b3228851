use std::{path::PathBuf, process::Command};

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn bryte(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_bryte"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the bryte binary");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn demo_world_runs_a_single_frame() {
    let config = demos().join("bryte.toml");
    let config = config.to_str().expect("utf-8 path");
    let (success, stdout) = bryte(&["run", "--config", config, "--frames", "1"]);

    assert!(success, "bryte run exited with an error:\n{stdout}");
    assert!(stdout.contains("room 0 of 2, 1 frames"), "unexpected summary:\n{stdout}");
    assert!(stdout.contains("health 25/25"), "unexpected summary:\n{stdout}");
}

#[test]
fn demo_script_replays_to_completion() {
    let config = demos().join("bryte.toml");
    let script = demos().join("opening.script");
    let (success, stdout) = bryte(&[
        "run",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--script",
        script.to_str().expect("utf-8 path"),
    ]);

    assert!(success, "scripted run exited with an error:\n{stdout}");
    assert!(stdout.contains("TimeAdvanced"), "unexpected summary:\n{stdout}");
}

#[test]
fn missing_config_fails() {
    let missing = demos().join("missing.toml");
    let (success, _) = bryte(&["run", "--config", missing.to_str().expect("utf-8 path")]);
    assert!(!success);
}
