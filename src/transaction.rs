//! Ephemeral-branch transactions.
//!
//! A transaction stages writes on a short-lived branch created from a
//! base branch and merges it back on completion, so readers of the base
//! branch never see half-finished work. Dropping an unfinished
//! transaction aborts it.
//!
//! ```rust,no_run
//! use lakefs_fs::LakeFs;
//!
//! # fn main() -> lakefs_fs::Result<()> {
//! let fs = LakeFs::connect()?;
//! let tx = fs.transaction("quickstart", "main")?;
//! fs.write_text(&tx.path("report.csv"), "a,b\n1,2\n")?;
//! tx.commit("add report")?;
//! tx.complete()?;
//! # Ok(())
//! # }
//! ```

use log::warn;
use uuid::Uuid;

use crate::actions;
use crate::error::Result;
use crate::fs::LakeFs;
use crate::types::{Commit, CommitOptions, DeletePolicy, MergeOptions, MergeResult, TransactionOptions};

/// A set of writes staged on an ephemeral branch.
///
/// Created via [`LakeFs::transaction`]; the branch exists from that
/// moment on. [`complete`](Transaction::complete) merges it into the
/// base branch, [`abort`](Transaction::abort) throws it away. When a
/// transaction fails midway the branch is kept for inspection unless
/// the delete policy is [`DeletePolicy::Always`].
#[derive(Debug)]
pub struct Transaction {
    fs: LakeFs,
    repository: String,
    base_branch: String,
    branch: String,
    delete: DeletePolicy,
    finished: bool,
}

impl Transaction {
    pub(crate) fn begin(
        fs: LakeFs,
        repository: &str,
        base_branch: &str,
        opts: TransactionOptions,
    ) -> Result<Transaction> {
        let branch = ephemeral_branch_name();
        fs.client().create_branch(repository, &branch, base_branch)?;
        Ok(Transaction {
            fs,
            repository: repository.to_string(),
            base_branch: base_branch.to_string(),
            branch,
            delete: opts.delete,
            finished: false,
        })
    }

    /// The filesystem this transaction writes through.
    pub fn fs(&self) -> &LakeFs {
        &self.fs
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Branch the transaction will merge back into.
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    /// Name of the ephemeral branch writes go to.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Full `repository/branch/path` form addressing `path` on the
    /// ephemeral branch.
    pub fn path(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/{}", self.repository, self.branch)
        } else {
            format!("{}/{}/{}", self.repository, self.branch, path)
        }
    }

    /// Commit the changes currently staged on the ephemeral branch.
    /// Returns `None` when there is nothing to commit.
    pub fn commit(&self, message: &str) -> Result<Option<Commit>> {
        self.commit_with(message, CommitOptions::default())
    }

    pub fn commit_with(&self, message: &str, opts: CommitOptions) -> Result<Option<Commit>> {
        actions::commit(self.fs.client(), &self.repository, &self.branch, message, opts)
    }

    /// Merge the ephemeral branch into the base branch, then delete it
    /// per the delete policy. A merge with no differences is a no-op
    /// and still counts as success.
    pub fn complete(mut self) -> Result<Option<MergeResult>> {
        let result = actions::merge(
            self.fs.client(),
            &self.repository,
            &self.branch,
            &self.base_branch,
            MergeOptions::default(),
        )?;
        self.finished = true;
        if matches!(self.delete, DeletePolicy::OnSuccess | DeletePolicy::Always) {
            self.fs
                .client()
                .delete_branch(&self.repository, &self.branch)?;
        }
        Ok(result)
    }

    /// Throw the staged changes away without merging.
    pub fn abort(mut self) -> Result<()> {
        self.finished = true;
        if self.delete == DeletePolicy::Always {
            self.fs
                .client()
                .delete_branch(&self.repository, &self.branch)?;
        }
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if self.delete == DeletePolicy::Always {
            if let Err(err) = self
                .fs
                .client()
                .delete_branch(&self.repository, &self.branch)
            {
                warn!("failed to delete transaction branch {}: {}", self.branch, err);
            }
        }
    }
}

fn ephemeral_branch_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("transaction-{}", &id[..8])
}
