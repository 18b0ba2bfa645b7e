//! Exchange configuration, loaded from `staffing.toml`.

use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use staffing_ingest::TableKind;
use tracing::info;

use crate::client::TableClient;
use crate::error::{ExchangeError, Result};
use crate::retry::RetryPolicy;
use crate::store::{LocalStore, RemoteStore, SftpStore};

/// Environment variable that overrides `sftp.password`.
pub const PASSWORD_ENV: &str = "STAFFING_SFTP_PASSWORD";

/// Which store the tables live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// A remote host reached over SFTP.
    Sftp,
    /// A directory on this machine.
    #[default]
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: Backend,
    pub local_dir: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            local_dir: PathBuf::from("./data"),
        }
    }
}

/// Connection settings for [`SftpStore`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SftpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub remote_dir: String,
    /// Socket timeout for connect, read and write.
    pub timeout_secs: u64,
}

impl Default for SftpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            user: String::new(),
            password: String::new(),
            remote_dir: ".".to_string(),
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for SftpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("remote_dir", &self.remote_dir)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            backoff_ms: u64::try_from(policy.backoff.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl RetrySettings {
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.backoff_ms))
    }
}

/// File name for each logical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub servicios: String,
    pub enfermeras: String,
    pub pacientes: String,
    pub transferencias: String,
    pub usuarios: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            servicios: TableKind::Services.default_file_name().to_string(),
            enfermeras: TableKind::Staff.default_file_name().to_string(),
            pacientes: TableKind::Patients.default_file_name().to_string(),
            transferencias: TableKind::Transfers.default_file_name().to_string(),
            usuarios: TableKind::Users.default_file_name().to_string(),
        }
    }
}

impl FileNames {
    #[must_use]
    pub fn get(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Services => &self.servicios,
            TableKind::Staff => &self.enfermeras,
            TableKind::Patients => &self.pacientes,
            TableKind::Transfers => &self.transferencias,
            TableKind::Users => &self.usuarios,
        }
    }
}

/// Everything needed to build a [`TableClient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub store: StoreSettings,
    pub sftp: SftpSettings,
    pub retry: RetrySettings,
    pub files: FileNames,
}

impl ExchangeConfig {
    /// Loads the configuration file, applies the password environment
    /// override and validates the result.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no configuration file found, using defaults");
                Self::default()
            }
            Err(err) => {
                return Err(ExchangeError::Config(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };
        if let Ok(password) = env::var(PASSWORD_ENV) {
            config.sftp.password = password;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text without validating it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| ExchangeError::Config(err.to_string()))
    }

    /// Checks fields that have no usable default.
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == Backend::Sftp {
            if self.sftp.host.trim().is_empty() {
                return Err(missing("sftp.host"));
            }
            if self.sftp.user.trim().is_empty() {
                return Err(missing("sftp.user"));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(ExchangeError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        for kind in TableKind::ALL {
            if self.files.get(kind).trim().is_empty() {
                return Err(ExchangeError::Config(format!(
                    "files.{} must not be empty",
                    kind.name()
                )));
            }
        }
        Ok(())
    }

    /// Builds the configured store. No connection is made until first use.
    #[must_use]
    pub fn open_store(&self) -> Box<dyn RemoteStore> {
        match self.store.backend {
            Backend::Sftp => Box::new(SftpStore::new(self.sftp.clone())),
            Backend::Local => Box::new(LocalStore::new(self.store.local_dir.clone())),
        }
    }

    /// Builds a client over the configured store.
    #[must_use]
    pub fn client(&self) -> TableClient<Box<dyn RemoteStore>> {
        TableClient::new(self.open_store())
            .with_retry(self.retry.policy())
            .with_files(self.files.clone())
    }
}

fn missing(field: &str) -> ExchangeError {
    ExchangeError::Config(format!("{field} is required for the sftp backend"))
}
