// tests/transport_process.rs
//
// Drives the whole binary pipeline with a shell script standing in for the
// transport, so no rsync is needed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use clap::Parser;
use syncwatch::cli::CliArgs;

/// Write an executable transport stand-in into `dir` that records its
/// arguments and stdin next to itself, then exits with `code`.
fn fake_transport(dir: &Path, code: i32) -> String {
    let script = dir.join("transport.sh");
    fs::write(
        &script,
        format!(
            concat!(
                "#!/bin/sh\n",
                "out=$(dirname \"$0\")\n",
                "printf '%s\\n' \"$@\" > \"$out/args\"\n",
                "cat > \"$out/stdin\"\n",
                "exit {code}\n",
            ),
            code = code
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script.display().to_string()
}

fn args(dir: &Path, transport: &str, extra: &[&str]) -> CliArgs {
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();

    let mut argv = vec![
        "syncwatch".to_string(),
        "--config".to_string(),
        dir.join("absent.toml").display().to_string(),
        "--local-dir".to_string(),
        src.display().to_string(),
        "--remote-dir".to_string(),
        dir.join("dst").display().to_string(),
        "--transport".to_string(),
        transport.to_string(),
        "--once".to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn once_runs_blanket_sync_with_filters_on_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let transport = fake_transport(dir.path(), 0);
    let args = args(
        dir.path(),
        &transport,
        &["--exclude", ".git*", "--exclude", "*.swp", "--simulate"],
    );

    syncwatch::run(args).await.unwrap();

    let recorded = fs::read_to_string(dir.path().join("args")).unwrap();
    let recorded: Vec<&str> = recorded.lines().collect();
    let src = dir.path().join("src").canonicalize().unwrap();
    assert_eq!(
        recorded,
        vec![
            "-r".to_string(),
            "--delete".to_string(),
            "--ignore-errors".to_string(),
            "--force".to_string(),
            "-n".to_string(),
            "--exclude-from=-".to_string(),
            format!("{}/", src.display()),
            dir.path().join("dst").display().to_string(),
        ]
    );

    let stdin = fs::read_to_string(dir.path().join("stdin")).unwrap();
    assert_eq!(stdin, ".git*\n*.swp");
}

#[tokio::test]
async fn once_reports_failed_transport() {
    let dir = tempfile::tempdir().unwrap();
    let transport = fake_transport(dir.path(), 23);

    let err = syncwatch::run(args(dir.path(), &transport, &[]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("initial sync failed"));
}

#[tokio::test]
async fn dry_run_does_not_invoke_transport() {
    let dir = tempfile::tempdir().unwrap();
    let transport = fake_transport(dir.path(), 0);

    syncwatch::run(args(dir.path(), &transport, &["--dry-run"]))
        .await
        .unwrap();
    assert!(!dir.path().join("args").exists());
}
