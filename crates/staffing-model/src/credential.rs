use serde::{Deserialize, Serialize};

/// One row of the users file: the credential hash that authorizes
/// transfer operations for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub service: String,
    /// Encoded password hash; never plaintext.
    pub password_hash: String,
}
