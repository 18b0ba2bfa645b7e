//! Byte-level storage backends.

mod local;
mod sftp;

pub use local::LocalStore;
pub use sftp::SftpStore;

use crate::error::Result;

/// A flat namespace of files that can be fetched and overwritten whole.
///
/// Implementations report a missing file as [`ExchangeError::NotFound`] and
/// transport problems as retryable errors; retrying is left to the caller.
///
/// [`ExchangeError::NotFound`]: crate::ExchangeError::NotFound
pub trait RemoteStore {
    /// Short description for log lines, e.g. `sftp://host/dir`.
    fn location(&self) -> String;

    /// Returns the full contents of `file`.
    fn fetch(&mut self, file: &str) -> Result<Vec<u8>>;

    /// Replaces `file` with `contents`.
    fn upload(&mut self, file: &str, contents: &[u8]) -> Result<()>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&mut self, file: &str) -> Result<Vec<u8>> {
        (**self).fetch(file)
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        (**self).upload(file, contents)
    }
}
