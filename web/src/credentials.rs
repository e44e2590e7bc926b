//! Admin credentials and salted password hashes.
//!
//! Hashes are stored as `sha256$<salt>$<hex digest>`, where the digest is
//! SHA-256 over the salt bytes followed by the password bytes.

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const SCHEME: &str = "sha256";

/// Error parsing a stored password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashFormatError {
    /// Not three `$`-separated parts.
    #[error("expected sha256$<salt>$<hex digest>")]
    Malformed,

    /// A scheme other than sha256.
    #[error("unsupported hash scheme: {0}")]
    UnsupportedScheme(String),

    /// The digest is not 64 hex characters.
    #[error("digest must be 64 hex characters")]
    BadDigest,
}

/// A salted SHA-256 password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: [u8; 32],
}

impl PasswordHash {
    /// Hash `password` with `salt`.
    #[must_use]
    pub fn derive(salt: &str, password: &str) -> Self {
        Self {
            salt: salt.to_string(),
            digest: digest(salt, password),
        }
    }

    /// Check `password` against this hash in constant time.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        constant_time_eq(&digest(&self.salt, password), &self.digest)
    }
}

fn digest(salt: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

impl FromStr for PasswordHash {
    type Err = HashFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '$');
        let (Some(scheme), Some(salt), Some(digest)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(HashFormatError::Malformed);
        };
        if scheme != SCHEME {
            return Err(HashFormatError::UnsupportedScheme(scheme.to_string()));
        }
        Ok(Self {
            salt: salt.to_string(),
            digest: decode_hex(digest).ok_or(HashFormatError::BadDigest)?,
        })
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}${}${}", self.salt, hex::encode(self.digest))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("salt", &self.salt)
            .field("digest", &"<redacted>")
            .finish()
    }
}

fn decode_hex(digest: &str) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(digest, &mut out).ok()?;
    Some(out)
}

/// The single admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: PasswordHash,
}

impl AdminCredentials {
    /// Credentials for `username` with the given password hash.
    #[must_use]
    pub fn new(username: impl Into<String>, password: PasswordHash) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Configured username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a username/password pair.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        // Both checks always run.
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = self.password.verify(password);
        user_ok & password_ok
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_derive_then_verify() {
        let hash = PasswordHash::derive("s4lt", "secret");
        assert!(hash.verify("secret"));
        assert!(!hash.verify("Secret"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn test_display_parses_back() {
        let hash = PasswordHash::derive("abc", "pw");
        let parsed: PasswordHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
        assert!(parsed.verify("pw"));
    }

    #[test]
    fn test_known_digest() {
        // sha256("saltpassword")
        let hash: PasswordHash =
            "sha256$salt$13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
                .parse()
                .unwrap();
        assert!(hash.verify("password"));
    }

    #[test]
    fn test_rejects_malformed_hashes() {
        assert_eq!(
            "plain".parse::<PasswordHash>(),
            Err(HashFormatError::Malformed)
        );
        assert_eq!(
            "sha1$salt$abcd".parse::<PasswordHash>(),
            Err(HashFormatError::UnsupportedScheme("sha1".to_string()))
        );
        assert_eq!(
            "sha256$salt$zz".parse::<PasswordHash>(),
            Err(HashFormatError::BadDigest)
        );
    }

    #[test]
    fn test_digest_accepts_uppercase_and_rejects_wrong_length() {
        let upper = "sha256$salt$13601BDA4EA78E55A07B98866D2BE6BE0744E3866F13C00C811CAB608A28F322";
        assert!(upper.parse::<PasswordHash>().unwrap().verify("password"));

        let short = "sha256$salt$13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f3";
        assert_eq!(short.parse::<PasswordHash>(), Err(HashFormatError::BadDigest));
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        let hash: PasswordHash =
            "sha256$salt$13601BDA4EA78E55A07B98866D2BE6BE0744E3866F13C00C811CAB608A28F322"
                .parse()
                .unwrap();
        assert_eq!(
            hash.to_string(),
            "sha256$salt$13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
        );
    }

    #[test]
    fn test_credentials_check_both_fields() {
        let creds = AdminCredentials::new("pi", PasswordHash::derive("x", "raspberry"));
        assert!(creds.verify("pi", "raspberry"));
        assert!(!creds.verify("root", "raspberry"));
        assert!(!creds.verify("pi", "wrong"));
    }

    #[test]
    fn test_debug_hides_digest() {
        let creds = AdminCredentials::new("pi", PasswordHash::derive("x", "raspberry"));
        assert!(format!("{creds:?}").contains("<redacted>"));
    }
}
