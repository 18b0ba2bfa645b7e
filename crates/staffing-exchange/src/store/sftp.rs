use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ssh2::{ErrorCode, Session, Sftp};
use tracing::{debug, info, warn};

use super::RemoteStore;
use crate::config::SftpSettings;
use crate::error::{ExchangeError, Result};

/// `LIBSSH2_FX_NO_SUCH_FILE`
const SFTP_NO_SUCH_FILE: i32 = 2;

/// An authenticated session and its SFTP channel.
struct Connection {
    // Keeps the transport alive for the channel.
    _session: Session,
    sftp: Sftp,
}

impl Connection {
    fn is_alive(&self, remote_dir: &Path) -> bool {
        match self.sftp.readdir(remote_dir) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "connection probe failed");
                false
            }
        }
    }
}

/// SFTP-backed store. The connection is opened on first use, cached, and
/// probed before every reuse.
pub struct SftpStore {
    settings: SftpSettings,
    connection: Option<Connection>,
}

impl SftpStore {
    pub fn new(settings: SftpSettings) -> Self {
        Self {
            settings,
            connection: None,
        }
    }

    fn remote_dir(&self) -> &Path {
        Path::new(&self.settings.remote_dir)
    }

    fn remote_path(&self, file: &str) -> PathBuf {
        self.remote_dir().join(file)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    fn connect(&self) -> Result<Connection> {
        let settings = &self.settings;
        let timeout = self.timeout();
        let address = (settings.host.as_str(), settings.port)
            .to_socket_addrs()
            .map_err(|err| ExchangeError::Connection(format!("{}: {err}", settings.host)))?
            .next()
            .ok_or_else(|| {
                ExchangeError::Connection(format!("{}: no address found", settings.host))
            })?;

        let tcp = TcpStream::connect_timeout(&address, timeout)
            .map_err(|err| ExchangeError::Connection(format!("{address}: {err}")))?;
        tcp.set_read_timeout(Some(timeout))
            .and_then(|()| tcp.set_write_timeout(Some(timeout)))
            .map_err(|err| ExchangeError::Connection(err.to_string()))?;

        let mut session = Session::new()?;
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(tcp);
        session.handshake()?;
        session.userauth_password(&settings.user, &settings.password)?;
        let sftp = session.sftp()?;

        info!(host = %settings.host, port = settings.port, "SFTP connection established");
        Ok(Connection {
            _session: session,
            sftp,
        })
    }

    /// Returns a live channel, reconnecting when the cached one fails its probe.
    fn channel(&mut self) -> Result<&Sftp> {
        let cached = match self.connection.take() {
            Some(connection) if connection.is_alive(self.remote_dir()) => Some(connection),
            Some(_) => {
                warn!(host = %self.settings.host, "stale SFTP connection, reconnecting");
                None
            }
            None => None,
        };
        let connection = match cached {
            Some(connection) => connection,
            None => self.connect()?,
        };
        Ok(&self.connection.insert(connection).sftp)
    }

    /// Maps an error from a file operation, dropping the connection when the
    /// transport itself failed.
    fn file_error(&mut self, file: &str, err: ssh2::Error) -> ExchangeError {
        match err.code() {
            ErrorCode::SFTP(SFTP_NO_SUCH_FILE) => ExchangeError::NotFound {
                file: file.to_string(),
            },
            ErrorCode::SFTP(_) => ExchangeError::io(file, err),
            ErrorCode::Session(_) => {
                self.connection = None;
                ExchangeError::Connection(err.to_string())
            }
        }
    }
}

impl RemoteStore for SftpStore {
    fn location(&self) -> String {
        format!(
            "sftp://{}:{}{}",
            self.settings.host,
            self.settings.port,
            self.remote_dir().display()
        )
    }

    fn fetch(&mut self, file: &str) -> Result<Vec<u8>> {
        let path = self.remote_path(file);
        let opened = self.channel()?.open(&path);
        let mut remote = match opened {
            Ok(remote) => remote,
            Err(err) => return Err(self.file_error(file, err)),
        };
        let mut contents = Vec::new();
        if let Err(err) = remote.read_to_end(&mut contents) {
            self.connection = None;
            return Err(ExchangeError::io(file, err));
        }
        debug!(path = %path.display(), bytes = contents.len(), "fetched remote file");
        Ok(contents)
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        let path = self.remote_path(file);
        let created = self.channel()?.create(&path);
        let mut remote = match created {
            Ok(remote) => remote,
            Err(err) => return Err(self.file_error(file, err)),
        };
        if let Err(err) = remote.write_all(contents).and_then(|()| remote.flush()) {
            self.connection = None;
            return Err(ExchangeError::io(file, err));
        }
        debug!(path = %path.display(), bytes = contents.len(), "uploaded remote file");
        Ok(())
    }
}
