use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variables honored by [`ClientConfig::discover`]. These are
/// the same names `lakectl` reads, so a working CLI setup carries over.
pub const ENV_ENDPOINT: &str = "LAKECTL_SERVER_ENDPOINT_URL";
pub const ENV_ACCESS_KEY_ID: &str = "LAKECTL_CREDENTIALS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "LAKECTL_CREDENTIALS_SECRET_ACCESS_KEY";

/// Connection settings for one server: endpoint plus key-pair credentials.
///
/// The endpoint is normalized to end in `/api/v1`, so both
/// `http://localhost:8000` and `http://localhost:8000/api/v1` are accepted.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl ClientConfig {
    /// Build a config from explicit values.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the endpoint is not an http(s) URL.
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: normalize_endpoint(&endpoint.into())?,
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        })
    }

    /// Discover settings from the environment, falling back per field to
    /// `~/.lakectl.yaml`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when a field is missing from both
    /// sources, or when the config file exists but cannot be parsed.
    pub fn discover() -> Result<Self> {
        let file = match default_config_path() {
            Some(path) if path.exists() => Some(LakectlFile::load(&path)?),
            _ => None,
        };
        Self::resolve(|name| env::var(name).ok(), file.as_ref())
    }

    fn resolve(
        get_env: impl Fn(&str) -> Option<String>,
        file: Option<&LakectlFile>,
    ) -> Result<Self> {
        let endpoint = get_env(ENV_ENDPOINT)
            .or_else(|| file.and_then(LakectlFile::endpoint_url))
            .ok_or_else(|| Error::config("no server endpoint configured"))?;
        let access_key_id = get_env(ENV_ACCESS_KEY_ID)
            .or_else(|| file.and_then(LakectlFile::access_key_id))
            .ok_or_else(|| Error::config("no access key id configured"))?;
        let secret_access_key = get_env(ENV_SECRET_ACCESS_KEY)
            .or_else(|| file.and_then(LakectlFile::secret_access_key))
            .ok_or_else(|| Error::config("no secret access key configured"))?;
        Self::new(endpoint, access_key_id, secret_access_key)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// lakectl config file
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct LakectlFile {
    #[serde(default)]
    server: Option<ServerSection>,
    #[serde(default)]
    credentials: Option<CredentialsSection>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default)]
    endpoint_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialsSection {
    #[serde(default)]
    access_key_id: Option<String>,
    #[serde(default)]
    secret_access_key: Option<String>,
}

impl LakectlFile {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text)
            .map_err(|err| Error::config(format!("{}: {}", path.display(), err)))
    }

    fn endpoint_url(&self) -> Option<String> {
        self.server.as_ref()?.endpoint_url.clone()
    }

    fn access_key_id(&self) -> Option<String> {
        self.credentials.as_ref()?.access_key_id.clone()
    }

    fn secret_access_key(&self) -> Option<String> {
        self.credentials.as_ref()?.secret_access_key.clone()
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".lakectl.yaml"))
}

fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::config(format!(
            "endpoint must be an http(s) URL: {:?}",
            raw,
        )));
    }
    if trimmed.ends_with("/api/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/api/v1", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_gains_api_suffix() {
        let cfg = ClientConfig::new("http://localhost:8000", "key", "secret").unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:8000/api/v1");
    }

    #[test]
    fn endpoint_suffix_not_doubled() {
        let cfg = ClientConfig::new("http://localhost:8000/api/v1/", "key", "secret").unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:8000/api/v1");
    }

    #[test]
    fn endpoint_requires_scheme() {
        assert!(ClientConfig::new("localhost:8000", "key", "secret").is_err());
    }

    #[test]
    fn resolve_prefers_env_over_file() {
        let file: LakectlFile = serde_yaml::from_str(
            "server:\n  endpoint_url: http://file:8000\ncredentials:\n  access_key_id: file-key\n  secret_access_key: file-secret\n",
        )
        .unwrap();
        let cfg = ClientConfig::resolve(
            |name| match name {
                ENV_ENDPOINT => Some("http://env:8000".into()),
                _ => None,
            },
            Some(&file),
        )
        .unwrap();
        assert_eq!(cfg.endpoint, "http://env:8000/api/v1");
        assert_eq!(cfg.access_key_id, "file-key");
        assert_eq!(cfg.secret_access_key, "file-secret");
    }

    #[test]
    fn resolve_missing_field_is_error() {
        let err = ClientConfig::resolve(|_| None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn file_sections_are_optional() {
        let file: LakectlFile = serde_yaml::from_str("server:\n  endpoint_url: http://x:1\n").unwrap();
        assert_eq!(file.endpoint_url().as_deref(), Some("http://x:1"));
        assert!(file.access_key_id().is_none());
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = ClientConfig::new("http://localhost:8000", "key", "hunter2").unwrap();
        let out = format!("{:?}", cfg);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("redacted"));
    }
}
