//! Cached access and refresh tokens.
//!
//! Tokens live in `tokens.json` under the user's configuration directory.
//! Writes go through a sibling temporary file and a rename so a crash never
//! leaves half a file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const TOKENS_FILE: &str = "tokens.json";

/// Token pair returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub at: String,
    pub rt: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("no configuration directory available for this user")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token cache {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKENS_FILE),
        }
    }

    /// Store in the platform configuration directory for `lifelog`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::NoConfigDir`] when no home directory can
    /// be determined.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        ProjectDirs::from("", "", "lifelog")
            .map(|dirs| Self::in_dir(dirs.config_dir()))
            .ok_or(TokenStoreError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached tokens, or `None` when nobody has logged in.
    pub fn load(&self) -> Result<Option<Tokens>, TokenStoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, tokens: &Tokens) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_vec_pretty(tokens).map_err(|source| {
            TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }

    /// Replace only the access token, keeping the refresh token.
    pub fn update_access(&self, at: String) -> Result<(), TokenStoreError> {
        match self.load()? {
            Some(tokens) => self.save(&Tokens { at, ..tokens }),
            None => Ok(()),
        }
    }

    /// Forget the cached tokens. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn tokens() -> Tokens {
        Tokens {
            at: "access".to_owned(),
            rt: "refresh".to_owned(),
        }
    }

    #[rstest]
    fn missing_file_means_logged_out(dir: TempDir) {
        let store = TokenStore::in_dir(dir.path());
        assert_eq!(store.load().expect("load"), None);
        assert!(!store.clear().expect("clear"));
    }

    #[rstest]
    fn saves_into_nested_directories(dir: TempDir) {
        let store = TokenStore::in_dir(dir.path().join("config").join("lifelog"));

        store.save(&tokens()).expect("save");

        assert_eq!(store.load().expect("load"), Some(tokens()));
        assert!(store.path().ends_with("tokens.json"));
    }

    #[rstest]
    fn update_access_keeps_refresh_token(dir: TempDir) {
        let store = TokenStore::in_dir(dir.path());
        store.save(&tokens()).expect("save");

        store.update_access("fresh".to_owned()).expect("update");

        let stored = store.load().expect("load").expect("tokens");
        assert_eq!(stored.at, "fresh");
        assert_eq!(stored.rt, "refresh");
    }

    #[rstest]
    fn clear_removes_tokens(dir: TempDir) {
        let store = TokenStore::in_dir(dir.path());
        store.save(&tokens()).expect("save");

        assert!(store.clear().expect("clear"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn corrupt_cache_is_reported(dir: TempDir) {
        let store = TokenStore::in_dir(dir.path());
        fs::write(store.path(), b"not json").expect("write");

        assert!(matches!(
            store.load(),
            Err(TokenStoreError::Corrupt { .. })
        ));
    }
}
