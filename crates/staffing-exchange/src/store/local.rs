use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::RemoteStore;
use crate::error::{ExchangeError, Result};

/// A directory on the local disk standing in for the remote store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RemoteStore for LocalStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch(&mut self, file: &str) -> Result<Vec<u8>> {
        let path = self.root.join(file);
        debug!(path = %path.display(), "reading local file");
        fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ExchangeError::NotFound {
                file: file.to_string(),
            },
            _ => ExchangeError::io(file, err),
        })
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|err| ExchangeError::io(file, err))?;
        let path = self.root.join(file);
        // Write beside the target, then rename over it.
        let staging = self.root.join(format!(".{file}.partial"));
        fs::write(&staging, contents).map_err(|err| ExchangeError::io(file, err))?;
        fs::rename(&staging, &path).map_err(|err| ExchangeError::io(file, err))?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote local file");
        Ok(())
    }
}
