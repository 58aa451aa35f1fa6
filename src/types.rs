use std::collections::HashMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Wire models
// ---------------------------------------------------------------------------

/// The type of a listing entry as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    Object,
    CommonPrefix,
}

impl PathType {
    pub fn is_object(self) -> bool {
        matches!(self, Self::Object)
    }
}

/// Metadata for one stored object (or common prefix) as returned by the
/// stat and listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStats {
    pub path: String,
    pub path_type: PathType,
    #[serde(default)]
    pub physical_address: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub mtime: Option<i64>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A repository as returned by the repository endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySummary {
    pub id: String,
    pub default_branch: String,
    pub storage_namespace: String,
    pub creation_date: i64,
}

/// A named ref (branch or tag) and the commit it points at.
#[derive(Debug, Clone, Deserialize)]
pub struct RefSummary {
    pub id: String,
    pub commit_id: String,
}

/// A commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub committer: String,
    #[serde(default)]
    pub parents: Vec<String>,
    pub creation_date: i64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Kinds of change reported by the diff endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    Added,
    Removed,
    Changed,
    Conflict,
    PrefixChanged,
}

/// A single diff entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Diff {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub path: String,
    pub path_type: PathType,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// Outcome of a merge: the commit created on the target branch.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeResult {
    pub reference: String,
}

/// Paging state attached to every listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub has_more: bool,
    #[serde(default)]
    pub next_offset: String,
    #[serde(default)]
    pub results: u64,
    #[serde(default)]
    pub max_per_page: u64,
}

/// One page of listing results.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub pagination: Pagination,
    pub results: Vec<T>,
}

// ---------------------------------------------------------------------------
// Filesystem entries
// ---------------------------------------------------------------------------

/// Whether an entry is an object or a directory-like prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// A filesystem-level description of an entry. `name` is always the full
/// `repository/ref/path` form.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub kind: EntryKind,
    pub checksum: Option<String>,
    pub mtime: Option<i64>,
    pub content_type: Option<String>,
}

impl FileInfo {
    /// Describe an object under `repository/ref`.
    pub fn from_object(repository: &str, reference: &str, stats: &ObjectStats) -> Self {
        Self {
            name: format!("{}/{}/{}", repository, reference, stats.path),
            size: stats.size_bytes.unwrap_or(0),
            kind: EntryKind::File,
            checksum: stats.checksum.clone(),
            mtime: stats.mtime,
            content_type: stats.content_type.clone(),
        }
    }

    /// Describe a directory-like prefix.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            kind: EntryKind::Directory,
            checksum: None,
            mtime: None,
            content_type: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// One directory visited during a walk: its full path (with a trailing
/// slash), the names of its subdirectories, and the names of its files.
#[derive(Debug, Clone)]
pub struct WalkDir {
    pub path: String,
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

/// One entry of a `cat_ranges` request. Offsets may be negative to count
/// from the end of the object; `None` means "from the start" / "to the
/// end". The end offset is exclusive.
#[derive(Debug, Clone)]
pub struct RangeRequest {
    pub path: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl RangeRequest {
    pub fn new(path: impl Into<String>, start: Option<i64>, end: Option<i64>) -> Self {
        Self {
            path: path.into(),
            start,
            end,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation options
// ---------------------------------------------------------------------------

/// Options for [`crate::LakeFs::scope`]: fields left `None` keep the
/// current filesystem's value.
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    /// Implicitly create missing branches before writes.
    pub create_branch_ok: Option<bool>,
    /// Source branch for implicitly created branches.
    pub source_branch: Option<String>,
}

/// Options for uploads from local disk.
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// Skip the upload when the remote checksum already matches the
    /// local file.
    pub precheck: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self { precheck: true }
    }
}

/// Options for removal.
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Delete everything under a directory-like path.
    pub recursive: bool,
}

/// Options for `touch`.
#[derive(Debug, Clone)]
pub struct TouchOptions {
    /// Overwrite an existing object with an empty one. Without this,
    /// touching an existing object is rejected: stored objects have no
    /// modification time that can be updated in place.
    pub truncate: bool,
}

impl Default for TouchOptions {
    fn default() -> Self {
        Self { truncate: true }
    }
}

/// Options for creating a commit.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Arbitrary key-value metadata recorded on the commit.
    pub metadata: HashMap<String, String>,
    /// Create the commit even when nothing changed.
    pub allow_empty: bool,
}

/// Options for merging.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Message for the merge commit.
    pub message: Option<String>,
}

/// When a transaction's ephemeral branch is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Delete the branch after a successful completion.
    #[default]
    OnSuccess,
    /// Delete the branch on completion and on abort.
    Always,
    /// Leave the branch in place.
    Never,
}

/// Options for starting a transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    pub delete: DeletePolicy,
}
