//! End-to-end runs against real processes.

use std::path::Path;

use protolens_lint::{CompletionStatus, LintManager, LintNotice, LinterConfig};
use protolens_types::DocumentLanguage;

#[cfg(unix)]
use crate::common::{fake_linter, proto_file};
#[cfg(unix)]
use protolens_config::ProtolensConfig;
#[cfg(unix)]
use protolens_lint::{SystemLauncher, run_lint};

#[cfg(unix)]
#[tokio::test]
async fn failing_linter_output_becomes_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_linter(
        dir.path(),
        "echo \"$2:3:5: 'Foo' is not defined\" >&2\n\
         echo \"$2:9:1: Expected top-level statement.\" >&2\n\
         echo \"protoc-gen-lint: Plugin failed with status code 1.\" >&2\n\
         exit 1\n",
    );
    let file = proto_file(dir.path(), "a.proto");

    let mut manager = LintManager::new(config);
    manager.on_document_saved(&file, &DocumentLanguage::from("proto"));
    manager.wait_for_idle().await;

    let diagnostics = manager.diagnostics_for(&file);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].display_with_path(Path::new("a.proto")),
        "a.proto:3:5: warning: 'Foo' is not defined"
    );
    assert!(manager.take_notices().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn passing_linter_clears_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let file = proto_file(dir.path(), "a.proto");

    let failing = fake_linter(dir.path(), "echo \"$2:1:1: 'X' bad\" >&2\nexit 1\n");
    let report = run_lint(&SystemLauncher, &failing, &file).await;
    assert_eq!(report.records().len(), 1);

    let passing = fake_linter(dir.path(), "exit 0\n");
    let report = run_lint(&SystemLauncher, &passing, &file).await;
    assert!(report.is_success());
    assert!(report.records().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn linter_receives_proto_path_and_basename() {
    let dir = tempfile::tempdir().unwrap();
    let file = proto_file(dir.path(), "b.proto");
    // Echo the arguments back as a diagnostic message.
    let config = fake_linter(dir.path(), "echo \"$2:1:1: 'args' $1 $3\" >&2\nexit 1\n");

    let report = run_lint(&SystemLauncher, &config, &file).await;
    let expected = format!("'args' --proto_path={} --lint_out=.", dir.path().display());
    assert_eq!(report.records()[0].reason(), expected);
}

#[cfg(unix)]
#[tokio::test]
async fn config_file_drives_the_manager() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fake-protoc.sh");
    std::fs::write(&script, "echo \"$2:2:4: 'Thing' is unused\" >&2\nexit 1\n").unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[linter]\nbinary = \"sh\"\nargs = [\"{}\"]\nseverity = \"error\"\n",
            script.display()
        ),
    )
    .unwrap();
    let file = proto_file(dir.path(), "c.proto");

    let config = ProtolensConfig::load(Some(&config_path)).unwrap();
    let mut manager = LintManager::new(config.linter);
    manager.on_document_opened(&file, &DocumentLanguage::from_path(&file));
    manager.wait_for_idle().await;

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.error_count(), 1);
    assert_eq!(snapshot.for_file(&file)[0].range().end(), 9);
}

#[tokio::test]
async fn absent_binary_is_reported_once() {
    let config = LinterConfig {
        binary: "protolens-test-absent-protoc".to_string(),
        ..LinterConfig::default()
    };
    let mut manager = LintManager::new(config);
    let language = DocumentLanguage::from("proto");

    manager.on_document_opened(Path::new("/w/a.proto"), &language);
    manager.on_document_saved(Path::new("/w/a.proto"), &language);
    manager.wait_for_idle().await;

    let completions = manager.take_completions();
    assert_eq!(completions.len(), 2);
    assert!(
        completions
            .iter()
            .all(|c| c.status() == CompletionStatus::LaunchFailed)
    );
    assert_eq!(
        manager.take_notices(),
        vec![LintNotice::ToolUnavailable {
            binary: "protolens-test-absent-protoc".to_string(),
            message: "linter binary 'protolens-test-absent-protoc' was not found".to_string(),
        }]
    );
    assert!(manager.snapshot().is_empty());
}
