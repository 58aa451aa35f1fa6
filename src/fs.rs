use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use sha2::{Digest, Sha256};

use crate::actions;
use crate::client::{ByteRange, LakeClient};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fileobj::{ObjectReader, ObjectWriter};
use crate::glob;
use crate::paths::LakePath;
use crate::transaction::Transaction;
use crate::types::{
    FileInfo, ObjectStats, PutOptions, RangeRequest, RmOptions, ScopeOptions, TouchOptions,
    TransactionOptions, WalkDir,
};

/// Branch that implicitly created branches start from, unless overridden
/// via [`ScopeOptions`].
pub const DEFAULT_SOURCE_BRANCH: &str = "main";

// ---------------------------------------------------------------------------
// LakeFs
// ---------------------------------------------------------------------------

/// A filesystem view of a versioning server.
///
/// Every path has the form `repository/ref/path/to/object`, optionally
/// prefixed with `lakefs://`. Reads work against any ref (branch, tag,
/// or commit digest); writes require a branch and land in its staging
/// area until committed.
///
/// Cheap to clone (the client is shared). No listing or content caches:
/// every operation reflects the server's current state.
#[derive(Debug, Clone)]
pub struct LakeFs {
    client: Arc<LakeClient>,
    create_branch_ok: bool,
    source_branch: String,
}

impl LakeFs {
    /// Wrap a client with the default write behavior: branches named in
    /// write paths are created from `main` when missing.
    pub fn new(client: LakeClient) -> Self {
        Self {
            client: Arc::new(client),
            create_branch_ok: true,
            source_branch: DEFAULT_SOURCE_BRANCH.to_string(),
        }
    }

    /// Build a filesystem from explicit connection settings.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(LakeClient::new(config)?))
    }

    /// Build a filesystem from discovered settings (environment first,
    /// then `~/.lakectl.yaml`).
    pub fn connect() -> Result<Self> {
        Self::with_config(ClientConfig::discover()?)
    }

    /// A copy of this filesystem with some settings overridden; the
    /// client connection is shared.
    pub fn scope(&self, opts: ScopeOptions) -> LakeFs {
        LakeFs {
            client: Arc::clone(&self.client),
            create_branch_ok: opts.create_branch_ok.unwrap_or(self.create_branch_ok),
            source_branch: opts
                .source_branch
                .unwrap_or_else(|| self.source_branch.clone()),
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &LakeClient {
        &self.client
    }

    /// Whether writes may implicitly create their branch.
    pub fn create_branch_ok(&self) -> bool {
        self.create_branch_ok
    }

    /// Source branch for implicitly created branches.
    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    /// Create the write branch from the source branch when allowed.
    fn prepare_branch(&self, location: &LakePath) -> Result<()> {
        if self.create_branch_ok {
            actions::ensure_branch(
                &self.client,
                &location.repository,
                &location.reference,
                &self.source_branch,
            )?;
        }
        Ok(())
    }

    fn require_object_path(&self, location: &LakePath, verb: &str) -> Result<()> {
        if location.is_root() {
            return Err(Error::invalid_path(format!(
                "cannot {} the ref root: {}",
                verb,
                location.spec(),
            )));
        }
        Ok(())
    }

    /// Writes need a branch. Ref expressions (`main~1`, `main^2`) always
    /// address commits, so they are rejected here; other non-branch refs
    /// are rejected by the server.
    fn require_branch(&self, location: &LakePath) -> Result<()> {
        if location.reference.contains('~') || location.reference.contains('^') {
            return Err(Error::read_only(location.spec()));
        }
        Ok(())
    }

    fn stat_if_exists(&self, location: &LakePath) -> Result<Option<ObjectStats>> {
        match self
            .client
            .stat_object(&location.repository, &location.reference, &location.path)
        {
            Ok(stats) => Ok(Some(stats)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Every entry under `location`, without delimiter (objects only,
    /// all pages).
    fn list_under(&self, location: &LakePath) -> Result<Vec<ObjectStats>> {
        let prefix = if location.is_root() {
            String::new()
        } else {
            format!("{}/", location.path)
        };
        self.client.list_all_objects(
            &location.repository,
            &location.reference,
            &prefix,
            None,
        )
    }

    fn entry_info(&self, location: &LakePath, stats: &ObjectStats) -> FileInfo {
        if stats.path_type.is_object() {
            FileInfo::from_object(&location.repository, &location.reference, stats)
        } else {
            FileInfo::directory(format!(
                "{}/{}/{}",
                location.repository,
                location.reference,
                stats.path.trim_end_matches('/'),
            ))
        }
    }

    // -- Stat ---------------------------------------------------------------

    /// Describe the entry at `path`.
    ///
    /// Object lookups are exact; when nothing is stored at the path
    /// itself, a one-entry listing under `path/` decides whether the
    /// path is a directory.
    pub fn info(&self, path: &str) -> Result<FileInfo> {
        let location = LakePath::parse(path)?;
        if location.is_root() {
            // the listing call validates that repository and ref exist
            self.client.list_objects(
                &location.repository,
                &location.reference,
                "",
                Some("/"),
                None,
                Some(1),
            )?;
            return Ok(FileInfo::directory(location.spec()));
        }
        match self
            .client
            .stat_object(&location.repository, &location.reference, &location.path)
        {
            Ok(stats) => Ok(FileInfo::from_object(
                &location.repository,
                &location.reference,
                &stats,
            )),
            Err(err) if err.is_not_found() => {
                let prefix = format!("{}/", location.path);
                let page = self.client.list_objects(
                    &location.repository,
                    &location.reference,
                    &prefix,
                    Some("/"),
                    None,
                    Some(1),
                )?;
                if page.results.is_empty() {
                    Err(Error::not_found(location.spec()))
                } else {
                    Ok(FileInfo::directory(location.spec()))
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Whether anything exists at `path`.
    pub fn exists(&self, path: &str) -> Result<bool> {
        match self.info(path) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether `path` names an object.
    pub fn is_file(&self, path: &str) -> Result<bool> {
        match self.info(path) {
            Ok(info) => Ok(info.is_file()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether `path` names a directory (a ref root or an object prefix).
    pub fn is_dir(&self, path: &str) -> Result<bool> {
        match self.info(path) {
            Ok(info) => Ok(info.is_dir()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Object size in bytes; directories report zero.
    pub fn size(&self, path: &str) -> Result<u64> {
        Ok(self.info(path)?.size)
    }

    /// The server-side checksum of an object.
    pub fn checksum(&self, path: &str) -> Result<String> {
        let location = LakePath::parse(path)?;
        self.require_object_path(&location, "checksum")?;
        let stats =
            self.client
                .stat_object(&location.repository, &location.reference, &location.path)?;
        stats
            .checksum
            .ok_or_else(|| Error::invalid_data(format!("no checksum for {}", location.spec())))
    }

    // -- Listing ------------------------------------------------------------

    /// List the immediate children of a directory, or the entry itself
    /// for an object path.
    pub fn ls(&self, path: &str) -> Result<Vec<FileInfo>> {
        let location = LakePath::parse(path)?;
        if !location.is_root() {
            match self
                .client
                .stat_object(&location.repository, &location.reference, &location.path)
            {
                Ok(stats) => {
                    return Ok(vec![FileInfo::from_object(
                        &location.repository,
                        &location.reference,
                        &stats,
                    )]);
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }
        let prefix = if location.is_root() {
            String::new()
        } else {
            format!("{}/", location.path)
        };
        let entries = self.client.list_all_objects(
            &location.repository,
            &location.reference,
            &prefix,
            Some("/"),
        )?;
        if entries.is_empty() && !location.is_root() {
            return Err(Error::not_found(location.spec()));
        }
        Ok(entries
            .iter()
            .map(|stats| self.entry_info(&location, stats))
            .collect())
    }

    /// Every object under `path`, as sorted full paths. An object path
    /// returns just itself; a missing path returns nothing.
    pub fn find(&self, path: &str) -> Result<Vec<String>> {
        let location = LakePath::parse(path)?;
        let entries = self.list_under(&location)?;
        let mut out: Vec<String> = entries
            .iter()
            .filter(|stats| stats.path_type.is_object())
            .map(|stats| {
                format!(
                    "{}/{}/{}",
                    location.repository, location.reference, stats.path,
                )
            })
            .collect();
        if out.is_empty() && !location.is_root() && self.stat_if_exists(&location)?.is_some() {
            out.push(location.spec());
        }
        out.sort();
        Ok(out)
    }

    /// Total size in bytes of every object under `path`.
    pub fn du(&self, path: &str) -> Result<u64> {
        let location = LakePath::parse(path)?;
        let entries = self.list_under(&location)?;
        if entries.is_empty() && !location.is_root() {
            return Ok(self
                .stat_if_exists(&location)?
                .and_then(|stats| stats.size_bytes)
                .unwrap_or(0));
        }
        Ok(entries
            .iter()
            .filter(|stats| stats.path_type.is_object())
            .filter_map(|stats| stats.size_bytes)
            .sum())
    }

    /// Walk the tree under `path` top-down, like `os.walk`: each entry
    /// carries the directory's full path (with a trailing slash), its
    /// subdirectory names, and its file names. Siblings are sorted.
    pub fn walk(&self, path: &str) -> Result<Vec<WalkDir>> {
        let location = LakePath::parse(path)?;
        let objects = self.list_under(&location)?;
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let prefix = if location.is_root() {
            String::new()
        } else {
            format!("{}/", location.path)
        };
        let tree = group_walk_tree(&objects, &prefix);
        let base = format!("{}/", location.spec());
        let mut out = Vec::new();
        emit_walk(&tree, "", &base, &mut out);
        Ok(out)
    }

    /// Expand a glob pattern into sorted matching object paths. `*` and
    /// `?` stay within one path segment; `**` spans segments. A pattern
    /// without magic acts as an existence probe.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let location = LakePath::parse(pattern)?;
        if glob::has_magic(&location.reference) {
            return Err(Error::unsupported(format!(
                "glob patterns cannot span refs: {}",
                pattern,
            )));
        }
        if !glob::has_magic(&location.path) {
            return Ok(if self.exists(&location.spec())? {
                vec![location.spec()]
            } else {
                Vec::new()
            });
        }
        let prefix = glob::glob_prefix(&location.path);
        let entries = self.client.list_all_objects(
            &location.repository,
            &location.reference,
            &prefix,
            None,
        )?;
        let mut out: Vec<String> = entries
            .iter()
            .filter(|stats| stats.path_type.is_object())
            .filter(|stats| glob::path_match(&location.path, &stats.path))
            .map(|stats| {
                format!(
                    "{}/{}/{}",
                    location.repository, location.reference, stats.path,
                )
            })
            .collect();
        out.sort();
        Ok(out)
    }

    // -- Read ---------------------------------------------------------------

    /// Read a whole object.
    pub fn cat(&self, path: &str) -> Result<Vec<u8>> {
        let location = LakePath::parse(path)?;
        if location.is_root() {
            return Err(Error::is_a_directory(location.spec()));
        }
        self.client
            .get_object(&location.repository, &location.reference, &location.path, None)
    }

    /// Read part of an object. Offsets follow slice semantics: `end` is
    /// exclusive, negative values count from the end of the object, and
    /// `None` means the start or end respectively.
    pub fn cat_file(&self, path: &str, start: Option<i64>, end: Option<i64>) -> Result<Vec<u8>> {
        let location = LakePath::parse(path)?;
        if location.is_root() {
            return Err(Error::is_a_directory(location.spec()));
        }
        let range = match (start, end) {
            (None, None) => None,
            (Some(s), None) if s >= 0 => Some(ByteRange::From(s as u64)),
            (Some(s), None) => Some(ByteRange::Suffix(s.unsigned_abs())),
            (None, Some(e)) if e >= 0 => {
                if e == 0 {
                    return Ok(Vec::new());
                }
                Some(ByteRange::Span(0, e as u64 - 1))
            }
            (Some(s), Some(e)) if s >= 0 && e >= 0 => {
                if e <= s {
                    return Ok(Vec::new());
                }
                Some(ByteRange::Span(s as u64, e as u64 - 1))
            }
            _ => {
                // a negative bound combined with another bound needs the size
                let size = self
                    .client
                    .stat_object(&location.repository, &location.reference, &location.path)?
                    .size_bytes
                    .unwrap_or(0) as i64;
                let s = start.unwrap_or(0);
                let e = end.unwrap_or(size);
                let s = if s < 0 { (size + s).max(0) } else { s.min(size) };
                let e = if e < 0 { (size + e).max(0) } else { e.min(size) };
                if e <= s {
                    return Ok(Vec::new());
                }
                Some(ByteRange::Span(s as u64, e as u64 - 1))
            }
        };
        let result = self.client.get_object(
            &location.repository,
            &location.reference,
            &location.path,
            range.as_ref(),
        );
        match result {
            // a range past the end of the object is an empty read
            Err(Error::Api { status: 416, .. }) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Read several ranges; failures are reported per entry rather than
    /// aborting the batch.
    pub fn cat_ranges(&self, requests: &[RangeRequest]) -> Vec<Result<Vec<u8>>> {
        requests
            .iter()
            .map(|req| self.cat_file(&req.path, req.start, req.end))
            .collect()
    }

    /// Read the same range from several objects, failing on the first
    /// error.
    pub fn cat_ranges_uniform(
        &self,
        paths: &[&str],
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Vec<u8>>> {
        paths
            .iter()
            .map(|path| self.cat_file(path, start, end))
            .collect()
    }

    /// First `count` bytes of an object.
    pub fn head(&self, path: &str, count: u64) -> Result<Vec<u8>> {
        self.cat_file(path, None, Some(count as i64))
    }

    /// Last `count` bytes of an object.
    pub fn tail(&self, path: &str, count: u64) -> Result<Vec<u8>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.cat_file(path, Some(-(count as i64)), None)
    }

    /// Read an object as UTF-8 text.
    pub fn read_text(&self, path: &str) -> Result<String> {
        String::from_utf8(self.cat(path)?)
            .map_err(|err| Error::invalid_data(format!("invalid UTF-8: {}", err)))
    }

    /// Open an object for buffered, seekable reading.
    pub fn open(&self, path: &str) -> Result<ObjectReader> {
        let location = LakePath::parse(path)?;
        if location.is_root() {
            return Err(Error::is_a_directory(location.spec()));
        }
        let stats =
            self.client
                .stat_object(&location.repository, &location.reference, &location.path)?;
        let size = stats.size_bytes.unwrap_or(0);
        Ok(ObjectReader::new(Arc::clone(&self.client), location, size))
    }

    // -- Write --------------------------------------------------------------

    /// Write raw bytes to an object on a branch. The write is staged on
    /// the branch until committed.
    pub fn pipe(&self, path: &str, data: &[u8]) -> Result<ObjectStats> {
        let location = LakePath::parse(path)?;
        self.require_object_path(&location, "write to")?;
        self.require_branch(&location)?;
        self.prepare_branch(&location)?;
        self.client.upload_object(
            &location.repository,
            &location.reference,
            &location.path,
            data.to_vec(),
            None,
        )
    }

    /// Write UTF-8 text to an object on a branch.
    pub fn write_text(&self, path: &str, text: &str) -> Result<ObjectStats> {
        self.pipe(path, text.as_bytes())
    }

    /// Create an empty object. With `truncate` off, touching an existing
    /// object fails: stored objects have no modification time that can
    /// be updated in place.
    pub fn touch(&self, path: &str, opts: TouchOptions) -> Result<()> {
        if !opts.truncate && self.exists(path)? {
            return Err(Error::unsupported(format!(
                "object already exists, refusing to overwrite: {}",
                path,
            )));
        }
        self.pipe(path, b"")?;
        Ok(())
    }

    /// Open a buffered writer that uploads the object on close.
    pub fn open_write(&self, path: &str) -> Result<ObjectWriter> {
        let location = LakePath::parse(path)?;
        self.require_object_path(&location, "write to")?;
        self.require_branch(&location)?;
        self.prepare_branch(&location)?;
        Ok(ObjectWriter::new(Arc::clone(&self.client), location, None))
    }

    /// Delete one object from a branch's staging area.
    pub fn rm_file(&self, path: &str) -> Result<()> {
        let location = LakePath::parse(path)?;
        self.require_object_path(&location, "delete")?;
        self.require_branch(&location)?;
        self.client
            .delete_object(&location.repository, &location.reference, &location.path)
    }

    /// Delete a path. Directories require `recursive`; their objects are
    /// removed in server-capped batches.
    pub fn rm(&self, path: &str, opts: RmOptions) -> Result<()> {
        let location = LakePath::parse(path)?;
        self.require_branch(&location)?;
        if !opts.recursive {
            if self.is_dir(path)? {
                return Err(Error::is_a_directory(location.spec()));
            }
            return self.rm_file(path);
        }
        let entries = self.list_under(&location)?;
        if entries.is_empty() {
            if location.is_root() {
                return Ok(());
            }
            return self.rm_file(path);
        }
        let paths: Vec<String> = entries
            .iter()
            .filter(|stats| stats.path_type.is_object())
            .map(|stats| stats.path.clone())
            .collect();
        for chunk in paths.chunks(LakeClient::DELETE_BATCH_MAX) {
            self.client
                .delete_objects(&location.repository, &location.reference, chunk)?;
        }
        Ok(())
    }

    /// Server-side copy within one repository. The destination ref must
    /// be a branch; the source may be any ref.
    pub fn cp_file(&self, src: &str, dst: &str) -> Result<ObjectStats> {
        let src = LakePath::parse(src)?;
        let dst = LakePath::parse(dst)?;
        if src.repository != dst.repository {
            return Err(Error::unsupported(format!(
                "cross-repository copy: {} -> {}",
                src.spec(),
                dst.spec(),
            )));
        }
        self.require_object_path(&src, "copy")?;
        self.require_object_path(&dst, "copy to")?;
        self.require_branch(&dst)?;
        self.client.copy_object(
            &dst.repository,
            &dst.reference,
            &dst.path,
            &src.reference,
            &src.path,
        )
    }

    /// Move an object: copy, then delete the source. Both refs must be
    /// branches.
    pub fn mv(&self, src: &str, dst: &str) -> Result<()> {
        self.cp_file(src, dst)?;
        self.rm_file(src)
    }

    /// Upload a local file. With `precheck` (the default), the upload is
    /// skipped when the remote checksum already matches the local bytes.
    pub fn put_file(&self, lpath: &Path, rpath: &str, opts: PutOptions) -> Result<()> {
        let location = LakePath::parse(rpath)?;
        self.require_object_path(&location, "write to")?;
        self.require_branch(&location)?;
        if opts.precheck {
            if let Some(remote) = self.stat_if_exists(&location)? {
                if let Some(remote_sum) = &remote.checksum {
                    if *remote_sum == sha256_file(lpath)? {
                        debug!(
                            "checksum match for {}, skipping upload",
                            location.spec(),
                        );
                        return Ok(());
                    }
                }
            }
        }
        let data = std::fs::read(lpath)?;
        self.prepare_branch(&location)?;
        self.client.upload_object(
            &location.repository,
            &location.reference,
            &location.path,
            data,
            None,
        )?;
        Ok(())
    }

    /// Alias for [`put_file`](Self::put_file) with default options.
    pub fn put(&self, lpath: &Path, rpath: &str) -> Result<()> {
        self.put_file(lpath, rpath, PutOptions::default())
    }

    /// Download an object to a local file, creating parent directories
    /// as needed.
    pub fn get_file(&self, rpath: &str, lpath: &Path) -> Result<()> {
        let data = self.cat(rpath)?;
        if let Some(parent) = lpath.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(lpath, data)?;
        Ok(())
    }

    /// Alias for [`get_file`](Self::get_file).
    pub fn get(&self, rpath: &str, lpath: &Path) -> Result<()> {
        self.get_file(rpath, lpath)
    }

    // -- Directories --------------------------------------------------------

    /// No-op: directories exist implicitly as object prefixes.
    pub fn mkdir(&self, path: &str) -> Result<()> {
        LakePath::parse(path)?;
        Ok(())
    }

    /// No-op, like [`mkdir`](Self::mkdir).
    pub fn makedirs(&self, path: &str) -> Result<()> {
        self.mkdir(path)
    }

    /// Always fails: prefixes disappear with their last object and
    /// cannot be removed directly.
    pub fn rmdir(&self, path: &str) -> Result<()> {
        let location = LakePath::parse(path)?;
        Err(Error::unsupported(format!(
            "cannot remove directory {}",
            location.spec(),
        )))
    }

    // -- Transactions -------------------------------------------------------

    /// Start a transaction against `base_branch`: writes go to an
    /// ephemeral branch that is merged back on completion.
    pub fn transaction(&self, repository: &str, base_branch: &str) -> Result<Transaction> {
        self.transaction_with(repository, base_branch, TransactionOptions::default())
    }

    pub fn transaction_with(
        &self,
        repository: &str,
        base_branch: &str,
        opts: TransactionOptions,
    ) -> Result<Transaction> {
        Transaction::begin(self.clone(), repository, base_branch, opts)
    }
}

impl fmt::Display for LakeFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("endpoint={}", self.client.config().endpoint)];
        if self.create_branch_ok {
            parts.push(format!("source_branch={}", self.source_branch));
        } else {
            parts.push("no-create".into());
        }
        write!(f, "LakeFs({})", parts.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Walk helpers
// ---------------------------------------------------------------------------

/// Group object paths into a dir -> (subdirs, files) table keyed by
/// directory path relative to `prefix`. Entries that do not start with
/// `prefix` are skipped rather than trusted to line up.
fn group_walk_tree(
    objects: &[ObjectStats],
    prefix: &str,
) -> BTreeMap<String, (BTreeSet<String>, Vec<String>)> {
    let mut tree: BTreeMap<String, (BTreeSet<String>, Vec<String>)> = BTreeMap::new();
    tree.insert(String::new(), Default::default());
    for stats in objects.iter().filter(|s| s.path_type.is_object()) {
        let Some(rel) = stats.path.strip_prefix(prefix) else {
            continue;
        };
        if rel.is_empty() {
            continue;
        }
        let mut dir = String::new();
        let mut parts = rel.split('/').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                tree.entry(dir.clone()).or_default().1.push(part.to_string());
            } else {
                tree.entry(dir.clone()).or_default().0.insert(part.to_string());
                dir = if dir.is_empty() {
                    part.to_string()
                } else {
                    format!("{}/{}", dir, part)
                };
                tree.entry(dir.clone()).or_default();
            }
        }
    }
    tree
}

/// Emit `dir` and its subtree in preorder with sorted siblings.
fn emit_walk(
    tree: &BTreeMap<String, (BTreeSet<String>, Vec<String>)>,
    dir: &str,
    base: &str,
    out: &mut Vec<WalkDir>,
) {
    let Some((dirs, files)) = tree.get(dir) else {
        return;
    };
    let path = if dir.is_empty() {
        base.to_string()
    } else {
        format!("{}{}/", base, dir)
    };
    let mut files = files.clone();
    files.sort();
    out.push(WalkDir {
        path,
        dirs: dirs.iter().cloned().collect(),
        files,
    });
    for child in dirs {
        let child_key = if dir.is_empty() {
            child.clone()
        } else {
            format!("{}/{}", dir, child)
        };
        emit_walk(tree, &child_key, base, out);
    }
}

/// SHA-256 of a file on disk, lowercase hex, reading in 1 MiB chunks.
fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}
