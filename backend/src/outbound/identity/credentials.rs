//! Identity provider credential file loading.

use std::fmt;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the identity credential file.
#[derive(Debug, Error)]
pub enum IdentityCredentialsError {
    /// The file could not be read.
    #[error("failed to read identity credentials at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The path has no file name component.
    #[error("identity credentials path {path} does not name a file")]
    NotAFile { path: PathBuf },
    /// The file is not valid credential JSON.
    #[error("invalid identity credentials in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Project id and web API key for the identity toolkit.
#[derive(Clone, Deserialize)]
pub struct IdentityCredentials {
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

impl fmt::Debug for IdentityCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredentials")
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl IdentityCredentials {
    /// Parse credentials from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the decode message when fields are missing or blank.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let credentials: Self = serde_json::from_str(text).map_err(|err| err.to_string())?;
        if credentials.project_id.trim().is_empty() {
            return Err("project_id must not be blank".to_owned());
        }
        if credentials.api_key.trim().is_empty() {
            return Err("api_key must not be blank".to_owned());
        }
        Ok(credentials)
    }

    /// Read and parse the credential file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityCredentialsError`] when the file is unreadable or
    /// malformed.
    pub fn load(path: &Path) -> Result<Self, IdentityCredentialsError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| IdentityCredentialsError::NotAFile {
                path: path.to_path_buf(),
            })?;
        let read_error = |source| IdentityCredentialsError::Read {
            path: path.to_path_buf(),
            source,
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let text = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
        Self::from_json(&text).map_err(|message| IdentityCredentialsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::snake(r#"{"project_id":"scholarlink","api_key":"key-123"}"#)]
    #[case::camel(r#"{"projectId":"scholarlink","apiKey":"key-123","clientEmail":"x"}"#)]
    fn parses_either_casing(#[case] json: &str) {
        let credentials = IdentityCredentials::from_json(json).expect("valid credentials");
        assert_eq!(credentials.project_id, "scholarlink");
        assert_eq!(credentials.api_key, "key-123");
    }

    #[rstest]
    fn blank_api_key_is_rejected() {
        let err = IdentityCredentials::from_json(r#"{"project_id":"p","api_key":"  "}"#)
            .expect_err("blank key");
        assert!(err.contains("api_key"));
    }

    #[rstest]
    fn debug_output_hides_api_key() {
        let credentials =
            IdentityCredentials::from_json(r#"{"project_id":"p","api_key":"secret-key"}"#)
                .expect("valid credentials");
        assert!(!format!("{credentials:?}").contains("secret-key"));
    }

    #[rstest]
    fn loads_from_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("service-account.json");
        Dir::open_ambient_dir(temp.path(), ambient_authority())
            .and_then(|dir| {
                dir.write("service-account.json", r#"{"project_id":"p","api_key":"k"}"#)
            })
            .expect("write credentials");
        let credentials = IdentityCredentials::load(&path).expect("loads");
        assert_eq!(credentials.project_id, "p");
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let temp = TempDir::new().expect("temp dir");
        let err = IdentityCredentials::load(&temp.path().join("absent.json"))
            .expect_err("missing file");
        assert!(matches!(err, IdentityCredentialsError::Read { .. }));
    }
}
