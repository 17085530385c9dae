/// Smoke tests to verify the binary runs without panicking
use std::process::{Command, Output};

fn fractree(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fractree"))
        .args(args)
        .env("RUST_LOG", "fractree=warn")
        .output()
        .expect("Failed to execute fractree")
}

#[test]
fn binary_shows_help() {
    let output = fractree(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fractree"), "Help output should mention fractree");
    assert!(stdout.contains("view"));
    assert!(stdout.contains("export"));
}

#[test]
fn binary_shows_version() {
    let output = fractree(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = fractree(&["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn print_draws_braille_tree() {
    let output = fractree(&["print", "--seed", "7", "--cols", "60", "--rows", "20"]);

    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(
        stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)),
        "Tree should be drawn with braille dots"
    );
}

#[test]
fn print_is_reproducible_with_seed() {
    let args = ["print", "--seed", "99", "--cols", "40", "--rows", "15"];
    let first = fractree(&args);
    let second = fractree(&args);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn malformed_parameter_still_draws() {
    let output = fractree(&["print", "--depth", "abc", "--seed", "3", "--cols", "40", "--rows", "15"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring unparsable value"));
    assert!(!String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn export_writes_png() {
    let path = std::env::temp_dir().join(format!("fractree-smoke-{}.png", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    let output = fractree(&["export", "--seed", "5", "--output", &path_str]);
    assert!(
        output.status.success(),
        "export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bytes = std::fs::read(&path).expect("PNG should exist");
    let _ = std::fs::remove_file(&path);
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn tiny_canvas_is_rejected_and_still_draws() {
    let started = std::time::Instant::now();
    let output = fractree(&[
        "print", "--seed", "1", "--depth", "0", "--width", "0.1", "--height", "0.1", "--cols", "80", "--rows", "24",
    ]);

    assert!(output.status.success());
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring canvas size out of range"));
    assert!(!String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn huge_branch_count_finishes() {
    let started = std::time::Instant::now();
    let output = fractree(&["print", "--seed", "2", "--depth", "0", "--branches", "4000000000", "--cols", "40", "--rows", "15"]);

    assert!(output.status.success());
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
