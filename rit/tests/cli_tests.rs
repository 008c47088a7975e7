use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn rit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rit").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_init_add_commit_log() {
    let dir = tempfile::tempdir().unwrap();
    rit(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".git/objects").is_dir());

    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    rit(dir.path()).args(["add", "a.txt"]).assert().success();
    rit(dir.path())
        .args(["commit", "-m", "first commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(root-commit)"));

    rit(dir.path())
        .args(["log", "--oneline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit"));
}

#[test]
fn test_hash_object_stdin_matches_git() {
    let dir = tempfile::tempdir().unwrap();
    rit(dir.path()).arg("init").assert().success();
    rit(dir.path())
        .args(["hash-object", "--stdin"])
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0\n");
}

#[test]
fn test_unknown_revision_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    rit(dir.path()).arg("init").assert().success();
    rit(dir.path())
        .args(["rev-parse", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision"));
}

#[test]
fn test_conflicting_merge_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        std::fs::write(dir.path().join(name), content).unwrap();
    };

    rit(dir.path()).arg("init").assert().success();
    write("a.txt", "X\n");
    rit(dir.path()).args(["add", "a.txt"]).assert().success();
    rit(dir.path()).args(["commit", "-m", "base"]).assert().success();

    rit(dir.path()).args(["checkout", "-b", "b"]).assert().success();
    write("a.txt", "Z\n");
    rit(dir.path()).args(["add", "a.txt"]).assert().success();
    rit(dir.path()).args(["commit", "-m", "theirs"]).assert().success();

    rit(dir.path()).args(["checkout", "main"]).assert().success();
    write("a.txt", "Y\n");
    rit(dir.path()).args(["add", "a.txt"]).assert().success();
    rit(dir.path()).args(["commit", "-m", "ours"]).assert().success();

    rit(dir.path())
        .args(["merge", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Automatic merge failed"));

    let conflicted = std::fs::read_to_string(dir.path().join("a.txt")).unwrap();
    assert_eq!(conflicted, "<<<<<<< HEAD\nY\n=======\nZ\n>>>>>>> b\n");
    assert!(dir.path().join(".git/MERGE_HEAD").exists());

    // resolve and conclude the merge without -m
    write("a.txt", "resolved\n");
    rit(dir.path()).args(["add", "a.txt"]).assert().success();
    rit(dir.path())
        .args(["commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge branch 'b'"));
    assert!(!dir.path().join(".git/MERGE_HEAD").exists());
}
