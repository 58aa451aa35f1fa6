mod common;

use lakefs_fs::{DeletePolicy, Error, TransactionOptions};

// ---------------------------------------------------------------------------
// lifecycle
// ---------------------------------------------------------------------------

#[test]
fn complete_merges_into_base() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs.transaction("quickstart", "main").unwrap();
    let branch = tx.branch().to_string();
    assert!(branch.starts_with("transaction-"));

    fs.pipe(&tx.path("report.csv"), b"a,b\n1,2\n").unwrap();
    let commit = tx.commit("add report").unwrap();
    assert!(commit.is_some());

    // changes are isolated until the transaction completes
    assert!(!fs.exists("quickstart/main/report.csv").unwrap());

    let merged = tx.complete().unwrap();
    assert!(merged.is_some());
    assert_eq!(fs.cat("quickstart/main/report.csv").unwrap(), b"a,b\n1,2\n");

    // the ephemeral branch is deleted after a successful merge
    let err = fs.client().get_branch("quickstart", &branch).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn empty_transaction_completes_quietly() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs.transaction("quickstart", "main").unwrap();
    let branch = tx.branch().to_string();

    assert!(tx.commit("nothing staged").unwrap().is_none());
    assert!(tx.complete().unwrap().is_none());

    let err = fs.client().get_branch("quickstart", &branch).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn abort_keeps_branch_for_inspection() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs.transaction("quickstart", "main").unwrap();
    let branch = tx.branch().to_string();

    fs.pipe(&tx.path("wip.txt"), b"half done").unwrap();
    tx.abort().unwrap();

    // default policy deletes only on success; the branch survives
    assert!(fs.client().get_branch("quickstart", &branch).is_ok());
    assert!(!fs.exists("quickstart/main/wip.txt").unwrap());
}

// ---------------------------------------------------------------------------
// delete policies
// ---------------------------------------------------------------------------

#[test]
fn always_policy_deletes_on_abort() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs
        .transaction_with(
            "quickstart",
            "main",
            TransactionOptions {
                delete: DeletePolicy::Always,
            },
        )
        .unwrap();
    let branch = tx.branch().to_string();
    tx.abort().unwrap();

    let err = fs.client().get_branch("quickstart", &branch).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn never_policy_keeps_branch_on_complete() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs
        .transaction_with(
            "quickstart",
            "main",
            TransactionOptions {
                delete: DeletePolicy::Never,
            },
        )
        .unwrap();
    let branch = tx.branch().to_string();

    fs.pipe(&tx.path("kept.txt"), b"kept").unwrap();
    tx.commit("add kept").unwrap();
    tx.complete().unwrap();

    assert!(fs.client().get_branch("quickstart", &branch).is_ok());
    assert!(fs.exists("quickstart/main/kept.txt").unwrap());
}

#[test]
fn dropped_transaction_keeps_branch_by_default() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs.transaction("quickstart", "main").unwrap();
    let branch = tx.branch().to_string();
    drop(tx);

    assert!(fs.client().get_branch("quickstart", &branch).is_ok());
}

#[test]
fn dropped_transaction_cleans_up_under_always() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs
        .transaction_with(
            "quickstart",
            "main",
            TransactionOptions {
                delete: DeletePolicy::Always,
            },
        )
        .unwrap();
    let branch = tx.branch().to_string();
    drop(tx);

    let err = fs.client().get_branch("quickstart", &branch).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// ---------------------------------------------------------------------------
// addressing
// ---------------------------------------------------------------------------

#[test]
fn path_addresses_the_ephemeral_branch() {
    let (_server, fs) = common::quickstart_fs();
    let tx = fs.transaction("quickstart", "main").unwrap();

    assert_eq!(tx.repository(), "quickstart");
    assert_eq!(tx.base_branch(), "main");
    assert_eq!(
        tx.path("a/b.txt"),
        format!("quickstart/{}/a/b.txt", tx.branch())
    );
    assert_eq!(tx.path(""), format!("quickstart/{}", tx.branch()));

    // the branch inherits the base branch contents
    assert!(fs.exists(&tx.path("README.md")).unwrap());
    tx.abort().unwrap();
}

#[test]
fn concurrent_transactions_use_distinct_branches() {
    let (_server, fs) = common::quickstart_fs();
    let tx1 = fs.transaction("quickstart", "main").unwrap();
    let tx2 = fs.transaction("quickstart", "main").unwrap();
    assert_ne!(tx1.branch(), tx2.branch());
    tx1.abort().unwrap();
    tx2.abort().unwrap();
}
