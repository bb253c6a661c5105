//! Lint passes driven through `LintManager` with a recording launcher.

use std::path::{Path, PathBuf};

use protolens_lint::{
    CompletionStatus, InvocationOutcome, LintManager, LintNotice, LinterConfig, TriggerDecision,
    run_lint,
};
use protolens_types::DocumentLanguage;

use crate::common::RecordingLauncher;

#[tokio::test]
async fn non_proto_document_spawns_nothing() {
    let launcher = RecordingLauncher::exiting(1, "a.proto:3:5: 'Foo' is not defined");
    let mut manager = LintManager::with_launcher(LinterConfig::default(), launcher.clone());

    for (path, language) in [
        ("/work/build.gradle", "groovy"),
        ("/work/schema.json", "json"),
        ("/work/a.proto", "plaintext"),
    ] {
        let decision =
            manager.on_document_saved(Path::new(path), &DocumentLanguage::from(language));
        assert_eq!(decision, TriggerDecision::Declined, "{language}");
    }

    manager.wait_for_idle().await;
    assert_eq!(launcher.call_count(), 0);
    assert!(manager.snapshot().is_empty());
    assert!(manager.take_completions().is_empty());
}

#[tokio::test]
async fn clean_run_yields_empty_diagnostics() {
    let launcher = RecordingLauncher::exiting(0, "");
    let report = run_lint(
        launcher.as_ref(),
        &LinterConfig::default(),
        Path::new("/w/a.proto"),
    )
    .await;

    assert!(matches!(report.outcome(), InvocationOutcome::Success));
    assert!(report.records().is_empty());
}

#[tokio::test]
async fn command_targets_directory_and_basename() {
    let launcher = RecordingLauncher::exiting(0, "");
    let mut manager = LintManager::with_launcher(LinterConfig::default(), launcher.clone());

    manager.on_document_opened(
        Path::new("/work/protos/api/v1/service.proto"),
        &DocumentLanguage::from("proto3"),
    );
    manager.wait_for_idle().await;

    let commands = launcher.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].program(), "protoc");
    assert_eq!(
        commands[0].args(),
        [
            "--proto_path=/work/protos/api/v1",
            "service.proto",
            "--lint_out=.",
        ]
    );
}

#[tokio::test]
async fn findings_are_rendered_per_file() {
    let launcher = RecordingLauncher::exiting(
        1,
        "a.proto:3:5: 'Foo' is not defined\na.proto:7:1: 'Bar' is not defined\n",
    );
    let mut manager = LintManager::with_launcher(LinterConfig::default(), launcher.clone());
    let path = PathBuf::from("/work/a.proto");

    let decision = manager.on_document_saved(&path, &DocumentLanguage::from("proto"));
    assert_eq!(decision, TriggerDecision::Scheduled { sequence: 1 });
    manager.wait_for_idle().await;

    let rendered: Vec<String> = manager
        .diagnostics_for(&path)
        .iter()
        .map(|d| d.display_with_path(&path))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "/work/a.proto:3:5: warning: 'Foo' is not defined",
            "/work/a.proto:7:1: warning: 'Bar' is not defined",
        ]
    );
    assert_eq!(manager.snapshot().status_string(), "E:0 W:2");
}

#[tokio::test]
async fn repeated_saves_get_increasing_sequences() {
    let launcher = RecordingLauncher::exiting(0, "");
    let mut manager = LintManager::with_launcher(LinterConfig::default(), launcher.clone());
    let language = DocumentLanguage::from("proto");

    let a = Path::new("/w/a.proto");
    let b = Path::new("/w/b.proto");
    assert_eq!(
        manager.on_document_saved(a, &language),
        TriggerDecision::Scheduled { sequence: 1 }
    );
    assert_eq!(
        manager.on_document_saved(a, &language),
        TriggerDecision::Scheduled { sequence: 2 }
    );
    assert_eq!(
        manager.on_document_saved(b, &language),
        TriggerDecision::Scheduled { sequence: 1 }
    );
    manager.wait_for_idle().await;

    let completions = manager.take_completions();
    assert_eq!(completions.len(), 3);
    // Only the sequence-1 run of a.proto can be stale, and only if it lost the race.
    for completion in &completions {
        if completion.is_stale() {
            assert_eq!(completion.path(), a);
            assert_eq!(completion.sequence(), 1);
        }
    }
    assert_eq!(launcher.call_count(), 3);
}

#[tokio::test]
async fn missing_tool_is_not_a_clean_result() {
    let launcher = RecordingLauncher::missing();
    let mut manager = LintManager::with_launcher(LinterConfig::default(), launcher.clone());

    manager.on_document_saved(Path::new("/w/a.proto"), &DocumentLanguage::from("proto"));
    manager.wait_for_idle().await;

    let completions = manager.take_completions();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].status(), CompletionStatus::LaunchFailed);
    assert!(matches!(
        manager.take_notices().as_slice(),
        [LintNotice::ToolUnavailable { binary, .. }] if binary == "protoc"
    ));
}
