//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

fn cli(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("graphrag-qa").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GRAPHRAG_FALLBACK_FILE")
        .env("GRAPHRAG_SOURCE_DOC", dir.path().join("missing.txt"));
    cmd
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build-graph"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_ask_without_credential() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["--memory", "ask", "What is GraphRAG?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"question\": \"What is GraphRAG?\""))
        .stdout(predicate::str::contains("Mock Data (OpenAI API key not configured)"));
}

#[test]
fn test_ask_rejects_blank_question() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["--memory", "ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Question cannot be empty"));
}

#[test]
fn test_stats_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["--memory", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entities: 0"))
        .stdout(predicate::str::contains("Fallback"));
}

#[test]
fn test_ingest_requires_credential() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.txt");
    std::fs::write(&doc, "GraphRAG combines graphs and retrieval.").unwrap();

    cli(&dir)
        .args(["--memory", "ingest"])
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to ingest"));
}
