use std::fmt;

use crate::error::{Error, Result};

/// URI scheme accepted (and printed) for fully qualified paths.
pub const SCHEME: &str = "lakefs://";

/// A parsed `repository/ref/path` triple.
///
/// Every path handed to the filesystem layer resolves to one of these:
/// the first segment names a repository, the second a ref (branch, tag,
/// or commit digest), and the rest is the object path inside that ref.
/// The object path is empty for the ref root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LakePath {
    pub repository: String,
    pub reference: String,
    pub path: String,
}

impl LakePath {
    /// Parse a path of the form `[lakefs://]repository/ref[/path]`.
    ///
    /// The object path is normalized (slashes collapsed, `.` segments
    /// removed); the repository and ref names are validated.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] or [`Error::InvalidRefName`] if any
    /// component is missing or malformed.
    pub fn parse(input: &str) -> Result<LakePath> {
        let rest = input.strip_prefix(SCHEME).unwrap_or(input);
        let rest = rest.trim_start_matches('/');

        let (repository, rest) = rest.split_once('/').ok_or_else(|| {
            Error::invalid_path(format!(
                "expected repository/ref[/path], got {:?}",
                input,
            ))
        })?;
        let (reference, path) = match rest.split_once('/') {
            Some((reference, path)) => (reference, path),
            None => (rest, ""),
        };

        validate_repository_name(repository)?;
        validate_ref_name(reference)?;
        let path = normalize_object_path(path)?;

        Ok(LakePath {
            repository: repository.to_string(),
            reference: reference.to_string(),
            path,
        })
    }

    /// The path without the URI scheme: `repository/ref[/path]`.
    pub fn spec(&self) -> String {
        if self.path.is_empty() {
            format!("{}/{}", self.repository, self.reference)
        } else {
            format!("{}/{}/{}", self.repository, self.reference, self.path)
        }
    }

    /// Same repository and ref with a different object path.
    pub fn with_path(&self, path: &str) -> Result<LakePath> {
        Ok(LakePath {
            repository: self.repository.clone(),
            reference: self.reference.clone(),
            path: normalize_object_path(path)?,
        })
    }

    /// Append one name to the object path.
    pub fn child(&self, name: &str) -> Result<LakePath> {
        if self.path.is_empty() {
            self.with_path(name)
        } else {
            self.with_path(&format!("{}/{}", self.path, name))
        }
    }

    /// The containing directory, or `None` at the ref root.
    pub fn parent(&self) -> Option<LakePath> {
        if self.path.is_empty() {
            return None;
        }
        let parent = match self.path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        Some(LakePath {
            repository: self.repository.clone(),
            reference: self.reference.clone(),
            path: parent,
        })
    }

    /// True when the object path is empty (the ref root).
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for LakePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SCHEME, self.spec())
    }
}

/// Normalize an object path: strip leading/trailing slashes, collapse
/// repeated slashes and `.` segments, reject `..`.
///
/// An empty result means the ref root.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the path contains `..` segments.
pub fn normalize_object_path(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok(String::new());
    }

    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        if seg.is_empty() || seg == "." {
            // empty segments come from leading/trailing/double slashes
            continue;
        }
        if seg == ".." {
            return Err(Error::invalid_path(format!(
                "path segment '{}' is not allowed",
                seg,
            )));
        }
        segments.push(seg);
    }

    Ok(segments.join("/"))
}

/// Validate a repository name: 3 to 63 characters, lowercase letters,
/// digits and hyphens, starting with a letter or digit.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the name violates any rule.
pub fn validate_repository_name(name: &str) -> Result<()> {
    if name.len() < 3 || name.len() > 63 {
        return Err(Error::invalid_path(format!(
            "repository name must be 3-63 characters: {:?}",
            name,
        )));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or('-');
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return Err(Error::invalid_path(format!(
            "repository name must start with a lowercase letter or digit: {:?}",
            name,
        )));
    }
    for ch in name.chars() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' {
            return Err(Error::invalid_path(format!(
                "repository name contains invalid character: {:?}",
                ch,
            )));
        }
    }
    Ok(())
}

/// Validate a ref name (branch, tag, commit digest, or a ref expression
/// such as `main~1`).
///
/// Slashes are rejected because a slash would make `repository/ref/path`
/// ambiguous. Whitespace and control characters are rejected outright.
///
/// # Errors
/// Returns [`Error::InvalidRefName`] if the name violates any rule.
pub fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_ref_name("ref name must not be empty"));
    }

    for ch in name.chars() {
        if ch == '/' || ch == '\\' || ch.is_whitespace() || ch.is_control() {
            return Err(Error::invalid_ref_name(format!(
                "ref name contains invalid character: {:?}",
                ch,
            )));
        }
    }

    if name.contains("..") {
        return Err(Error::invalid_ref_name("ref name must not contain '..'"));
    }

    if name.ends_with('.') {
        return Err(Error::invalid_ref_name("ref name must not end with '.'"));
    }

    Ok(())
}
