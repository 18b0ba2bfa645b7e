//! Per-service credentials.
//!
//! Each service has one shared password, stored in `usuarios.csv` as a
//! PBKDF2-HMAC-SHA256 hash in the form
//! `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`.

use std::fmt;
use std::str::FromStr;

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use staffing_model::{UserCredential, service_key};
use tracing::debug;

use crate::error::AuthError;

/// Scheme tag at the start of every encoded hash.
pub const HASH_SCHEME: &str = "pbkdf2-sha256";

/// Iteration count for newly created hashes.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Decides whether a credential grants access to a service.
pub trait CredentialVerifier {
    fn verify(&self, service: &str, credential: &str) -> Result<(), AuthError>;
}

/// A decoded password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl PasswordHash {
    /// Hashes `password` with a fresh random salt.
    #[must_use]
    pub fn generate(password: &str, iterations: u32) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(password, &salt, iterations)
    }

    #[must_use]
    pub fn with_salt(password: &str, salt: &[u8], iterations: u32) -> Self {
        let iterations = iterations.max(1);
        Self {
            iterations,
            salt: salt.to_vec(),
            key: derive_key(password, salt, iterations, KEY_LEN),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derives a key from `password` and compares it in constant time.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive_key(password, &self.salt, self.iterations, self.key.len());
        constant_time_eq(&candidate, &self.key)
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{HASH_SCHEME}${}${}${}",
            self.iterations,
            hex::encode(&self.salt),
            hex::encode(&self.key)
        )
    }
}

impl FromStr for PasswordHash {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| AuthError::MalformedHash(reason.to_string());
        let mut parts = s.trim().split('$');
        if parts.next() != Some(HASH_SCHEME) {
            return Err(malformed("unsupported scheme"));
        }
        let (Some(iterations), Some(salt), Some(key), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected four '$'-separated fields"));
        };
        let iterations = iterations
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| malformed("invalid iteration count"))?;
        let salt = hex::decode(salt).map_err(|_| malformed("salt is not hex"))?;
        let key = hex::decode(key).map_err(|_| malformed("hash is not hex"))?;
        if key.is_empty() {
            return Err(malformed("empty hash"));
        }
        Ok(Self {
            iterations,
            salt,
            key,
        })
    }
}

/// Hashes `password` with a fresh salt and the default iteration count,
/// returning the encoded form stored in `usuarios.csv`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    PasswordHash::generate(password, DEFAULT_ITERATIONS).to_string()
}

fn derive_key(password: &str, salt: &[u8], iterations: u32, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Credentials loaded from the users table.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserCredential>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    pub fn find(&self, service: &str) -> Option<&UserCredential> {
        let key = service_key(service);
        self.users.iter().find(|user| service_key(&user.service) == key)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialVerifier for UserDirectory {
    fn verify(&self, service: &str, credential: &str) -> Result<(), AuthError> {
        let user = self
            .find(service)
            .ok_or_else(|| AuthError::UnknownService(service.to_string()))?;
        let hash: PasswordHash = user.password_hash.parse()?;
        if hash.verify(credential) {
            debug!(service, "credential accepted");
            Ok(())
        } else {
            Err(AuthError::InvalidCredential {
                service: service.to_string(),
            })
        }
    }
}
