//! A filesystem view of lakeFS-style versioned object stores.
//!
//! `lakefs-fs` lets file-oriented code — readers, writers, glob and walk
//! utilities — operate against a remote object store that versions its
//! contents through repositories, branches, and commits. Paths name a
//! `repository/ref/object` triple; reads work against any ref, writes
//! stage changes on a branch until committed.
//!
//! # Key types
//!
//! - [`LakeFs`] — the filesystem adapter: `ls`, `walk`, `glob`, ranged
//!   reads, uploads and downloads, all addressed by path strings.
//! - [`LakeClient`] — the typed API client underneath, one method per
//!   remote operation.
//! - [`Transaction`] — writes staged on an ephemeral branch, merged back
//!   on completion.
//! - [`actions`] — commit, merge, revert, and tag convenience functions.
//!
//! # Quick example
//!
//! ```rust,no_run
//! use lakefs_fs::LakeFs;
//!
//! # fn main() -> lakefs_fs::Result<()> {
//! // Reads settings from LAKECTL_* variables or ~/.lakectl.yaml.
//! let fs = LakeFs::connect()?;
//!
//! // Read from a branch.
//! let readme = fs.read_text("quickstart/main/README.md")?;
//! println!("{}", readme);
//!
//! // Stage a write on the branch.
//! fs.write_text("quickstart/main/notes.txt", "hello")?;
//!
//! // Expand a glob against a commit digest or tag just as well.
//! for path in fs.glob("quickstart/main/images/*.png")? {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod fileobj;
pub mod fs;
pub mod glob;
pub mod paths;
pub mod transaction;
pub mod types;

// Re-export primary public types at crate root.
pub use client::{ByteRange, LakeClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use fileobj::{ObjectReader, ObjectWriter};
pub use fs::LakeFs;
pub use paths::LakePath;
pub use transaction::Transaction;
pub use types::*;
