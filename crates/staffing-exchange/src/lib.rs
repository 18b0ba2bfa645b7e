//! File exchange for staffing tables.
//!
//! Tables live as CSV files in a flat store: a directory on an SFTP server,
//! or a local directory. [`TableClient`] reads and writes them whole, applying
//! a [`RetryPolicy`] to transient failures. A missing file is reported as
//! [`ExchangeError::NotFound`] right away.
//!
//! ```ignore
//! use staffing_exchange::ExchangeConfig;
//! use staffing_ingest::TableKind;
//!
//! let config = ExchangeConfig::load("staffing.toml".as_ref())?;
//! let mut client = config.client();
//! let services = client.read(TableKind::Services)?;
//! ```

mod client;
mod config;
mod error;
mod retry;
mod store;

// === Error Types ===
pub use error::{ExchangeError, Result};

// === Configuration ===
pub use config::{
    Backend, ExchangeConfig, FileNames, PASSWORD_ENV, RetrySettings, SftpSettings, StoreSettings,
};

// === Retry ===
pub use retry::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, RetryPolicy};

// === Stores ===
pub use store::{LocalStore, RemoteStore, SftpStore};

// === Client ===
pub use client::TableClient;
