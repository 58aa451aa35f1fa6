//! Version-control actions layered on the API client.
//!
//! These free functions wrap the raw versioning endpoints with the
//! behavior callers usually want: committing or merging when nothing
//! changed logs a warning and returns `None` instead of creating an
//! empty commit, and tag creation is idempotent.
//!
//! ```rust,no_run
//! use lakefs_fs::{actions, types::CommitOptions, LakeFs};
//!
//! # fn main() -> lakefs_fs::Result<()> {
//! let fs = LakeFs::connect()?;
//! fs.write_text("quickstart/main/notes.txt", "hello")?;
//! actions::commit(
//!     fs.client(),
//!     "quickstart",
//!     "main",
//!     "add notes",
//!     CommitOptions::default(),
//! )?;
//! # Ok(())
//! # }
//! ```

use log::warn;

use crate::client::LakeClient;
use crate::error::{Error, Result};
use crate::types::{Commit, CommitOptions, MergeOptions, MergeResult, RefSummary};

/// Commit the staged changes on a branch.
///
/// Returns `Ok(None)` without creating a commit when the branch has no
/// uncommitted changes, unless [`CommitOptions::allow_empty`] is set.
pub fn commit(
    client: &LakeClient,
    repository: &str,
    branch: &str,
    message: &str,
    opts: CommitOptions,
) -> Result<Option<Commit>> {
    if !opts.allow_empty {
        let diff = client.diff_branch(repository, branch, None, Some(1))?;
        if diff.results.is_empty() {
            warn!("No changes to commit on branch '{}'.", branch);
            return Ok(None);
        }
    }
    let commit = client.commit(repository, branch, message, &opts.metadata, opts.allow_empty)?;
    Ok(Some(commit))
}

/// Merge `source_ref` into `target_branch`.
///
/// Returns `Ok(None)` without merging when the refs do not differ.
pub fn merge(
    client: &LakeClient,
    repository: &str,
    source_ref: &str,
    target_branch: &str,
    opts: MergeOptions,
) -> Result<Option<MergeResult>> {
    let diff = client.diff_refs(repository, target_branch, source_ref, None, Some(1))?;
    if diff.results.is_empty() {
        warn!("No difference between source and target. Aborting merge.");
        return Ok(None);
    }
    let result = client.merge(repository, source_ref, target_branch, opts.message.as_deref())?;
    Ok(Some(result))
}

/// Revert the effect of a commit on a branch; the revert itself becomes
/// a new commit.
///
/// `parent_number` selects the mainline when reverting a merge commit;
/// pass 1 for ordinary commits.
pub fn revert(
    client: &LakeClient,
    repository: &str,
    branch: &str,
    parent_number: u32,
) -> Result<()> {
    client.revert_branch(repository, branch, branch, parent_number)
}

/// Create a tag pointing at `reference`.
///
/// Idempotent: when the tag already exists it is fetched and returned
/// instead of failing with a conflict.
pub fn create_tag(
    client: &LakeClient,
    repository: &str,
    reference: &str,
    tag: &str,
) -> Result<RefSummary> {
    match client.create_tag(repository, tag, reference) {
        Ok(summary) => Ok(summary),
        Err(err) if err.is_conflict() => client.get_tag(repository, tag),
        Err(err) => Err(err),
    }
}

/// Create `branch` from `source` when it does not exist yet.
///
/// A conflict from the server means the branch is already there, which
/// counts as success.
pub fn ensure_branch(
    client: &LakeClient,
    repository: &str,
    branch: &str,
    source: &str,
) -> Result<()> {
    match client.create_branch(repository, branch, source) {
        Ok(_) => Ok(()),
        Err(err) if err.is_conflict() => Ok(()),
        Err(err) => Err(err),
    }
}

/// Resolve a ref to a commit, walking `parent` entries back through the
/// commit log (`parent == 0` is the ref's own commit).
pub fn rev_parse(
    client: &LakeClient,
    repository: &str,
    reference: &str,
    parent: usize,
) -> Result<Commit> {
    let amount = parent as u64 + 1;
    let log = client.log_commits(repository, reference, None, Some(amount))?;
    log.results.into_iter().nth(parent).ok_or_else(|| {
        Error::not_found(format!("{}: ref {} has no parent #{}", repository, reference, parent))
    })
}
