mod common;

use std::collections::HashMap;

use lakefs_fs::{actions, CommitOptions, Error};

// ---------------------------------------------------------------------------
// commit
// ---------------------------------------------------------------------------

#[test]
fn commit_records_staged_changes() {
    let (_server, fs) = common::quickstart_fs();
    fs.pipe("quickstart/main/new.txt", b"data").unwrap();

    let commit = actions::commit(
        fs.client(),
        "quickstart",
        "main",
        "add new.txt",
        Default::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(commit.message, "add new.txt");

    let diff = fs
        .client()
        .diff_branch("quickstart", "main", None, None)
        .unwrap();
    assert!(diff.results.is_empty());
}

#[test]
fn commit_clean_branch_is_none() {
    let (_server, fs) = common::quickstart_fs();
    let outcome = actions::commit(
        fs.client(),
        "quickstart",
        "main",
        "nothing to do",
        Default::default(),
    )
    .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn commit_allow_empty_always_commits() {
    let (_server, fs) = common::quickstart_fs();
    let commit = actions::commit(
        fs.client(),
        "quickstart",
        "main",
        "checkpoint",
        CommitOptions {
            allow_empty: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(commit.is_some());
}

#[test]
fn commit_metadata_is_recorded() {
    let (_server, fs) = common::quickstart_fs();
    fs.pipe("quickstart/main/meta.txt", b"m").unwrap();

    let mut metadata = HashMap::new();
    metadata.insert("pipeline".to_string(), "nightly".to_string());
    let commit = actions::commit(
        fs.client(),
        "quickstart",
        "main",
        "tagged commit",
        CommitOptions {
            metadata,
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    let fetched = fs.client().get_commit("quickstart", &commit.id).unwrap();
    assert_eq!(fetched.metadata.get("pipeline").map(String::as_str), Some("nightly"));
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[test]
fn merge_applies_source_changes() {
    let (_server, fs) = common::quickstart_fs();
    fs.pipe("quickstart/feature/new.txt", b"feature work").unwrap();
    actions::commit(
        fs.client(),
        "quickstart",
        "feature",
        "feature commit",
        Default::default(),
    )
    .unwrap();

    let result = actions::merge(
        fs.client(),
        "quickstart",
        "feature",
        "main",
        Default::default(),
    )
    .unwrap()
    .unwrap();
    assert!(!result.reference.is_empty());
    assert_eq!(fs.cat("quickstart/main/new.txt").unwrap(), b"feature work");
}

#[test]
fn merge_without_difference_is_none() {
    let (_server, fs) = common::quickstart_fs();
    // a fresh branch is identical to its source
    actions::ensure_branch(fs.client(), "quickstart", "twin", "main").unwrap();
    let outcome = actions::merge(
        fs.client(),
        "quickstart",
        "twin",
        "main",
        Default::default(),
    )
    .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn merge_twice_second_is_noop() {
    let (_server, fs) = common::quickstart_fs();
    fs.pipe("quickstart/feature/x.txt", b"x").unwrap();
    actions::commit(fs.client(), "quickstart", "feature", "x", Default::default()).unwrap();

    let first = actions::merge(
        fs.client(),
        "quickstart",
        "feature",
        "main",
        Default::default(),
    )
    .unwrap();
    assert!(first.is_some());

    let second = actions::merge(
        fs.client(),
        "quickstart",
        "feature",
        "main",
        Default::default(),
    )
    .unwrap();
    assert!(second.is_none());
}

// ---------------------------------------------------------------------------
// revert
// ---------------------------------------------------------------------------

#[test]
fn revert_discards_head_commit() {
    let (_server, fs) = common::quickstart_fs();
    fs.pipe("quickstart/scratch/mistake.txt", b"oops").unwrap();
    actions::commit(
        fs.client(),
        "quickstart",
        "scratch",
        "bad commit",
        Default::default(),
    )
    .unwrap();
    assert!(fs.exists("quickstart/scratch/mistake.txt").unwrap());

    actions::revert(fs.client(), "quickstart", "scratch", 1).unwrap();

    assert!(!fs.exists("quickstart/scratch/mistake.txt").unwrap());
    let diff = fs
        .client()
        .diff_refs("quickstart", "main", "scratch", None, None)
        .unwrap();
    assert!(diff.results.is_empty());
}

// ---------------------------------------------------------------------------
// tags
// ---------------------------------------------------------------------------

#[test]
fn create_tag_pins_a_commit() {
    let (server, fs) = common::quickstart_fs();
    let head = server.resolve("quickstart", "main");

    let tag = actions::create_tag(fs.client(), "quickstart", "main", "v1.0").unwrap();
    assert_eq!(tag.commit_id, head);

    // tags resolve in read paths like any other ref
    assert_eq!(
        fs.read_text("quickstart/v1.0/README.md").unwrap(),
        common::README
    );
}

#[test]
fn create_tag_is_idempotent() {
    let (_server, fs) = common::quickstart_fs();
    let first = actions::create_tag(fs.client(), "quickstart", "main", "v1.0").unwrap();
    let second = actions::create_tag(fs.client(), "quickstart", "main", "v1.0").unwrap();
    assert_eq!(first.commit_id, second.commit_id);
}

#[test]
fn tag_survives_branch_advance() {
    let (_server, fs) = common::quickstart_fs();
    actions::create_tag(fs.client(), "quickstart", "main", "before").unwrap();

    fs.pipe("quickstart/main/later.txt", b"later").unwrap();
    actions::commit(fs.client(), "quickstart", "main", "advance", Default::default()).unwrap();

    assert!(!fs.exists("quickstart/before/later.txt").unwrap());
    assert!(fs.exists("quickstart/main/later.txt").unwrap());
}

// ---------------------------------------------------------------------------
// ensure_branch / rev_parse
// ---------------------------------------------------------------------------

#[test]
fn ensure_branch_tolerates_existing() {
    let (_server, fs) = common::quickstart_fs();
    actions::ensure_branch(fs.client(), "quickstart", "main", "main").unwrap();
    actions::ensure_branch(fs.client(), "quickstart", "b1", "main").unwrap();
    actions::ensure_branch(fs.client(), "quickstart", "b1", "main").unwrap();
    assert!(fs.exists("quickstart/b1/README.md").unwrap());
}

#[test]
fn rev_parse_walks_first_parents() {
    let (server, fs) = common::quickstart_fs();
    let old_head = server.resolve("quickstart", "main");

    fs.pipe("quickstart/main/extra.txt", b"extra").unwrap();
    let commit = actions::commit(
        fs.client(),
        "quickstart",
        "main",
        "extra",
        Default::default(),
    )
    .unwrap()
    .unwrap();

    let head = actions::rev_parse(fs.client(), "quickstart", "main", 0).unwrap();
    assert_eq!(head.id, commit.id);

    let parent = actions::rev_parse(fs.client(), "quickstart", "main", 1).unwrap();
    assert_eq!(parent.id, old_head);
}

#[test]
fn rev_parse_past_root_errors() {
    let (_server, fs) = common::quickstart_fs();
    let err = actions::rev_parse(fs.client(), "quickstart", "main", 10).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
