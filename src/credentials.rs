//! Sender credential handling
//!
//! The app password only leaves [`Credential`] through [`Credential::expose`],
//! which is called when the send request is written to the wire.

use crate::error::SenderResult;
use keyring::Entry;
use std::fmt;

const KEYRING_SERVICE: &str = "email-sender";

/// App-specific password for the sender account
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for the request body only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    /// Masked form for display
    pub fn masked(&self) -> String {
        "•".repeat(self.len())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "Credential(<empty>)")
        } else {
            write!(f, "Credential(<redacted>)")
        }
    }
}

/// OS keyring storage for app passwords, keyed by sender address
#[derive(Debug, Clone)]
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    /// Load the stored password for a sender, if the keyring has one
    pub fn load(&self, sender: &str) -> Option<Credential> {
        if sender.is_empty() {
            return None;
        }

        match Entry::new(&self.service, sender) {
            Ok(entry) => match entry.get_password() {
                Ok(secret) => {
                    tracing::debug!("Loaded stored credential for {}", sender);
                    Some(Credential::new(secret))
                }
                Err(keyring::Error::NoEntry) => None,
                Err(e) => {
                    tracing::warn!("Keyring lookup failed for {}: {}", sender, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Keyring unavailable ({}), no stored credential", e);
                None
            }
        }
    }

    /// Store a password for a sender
    pub fn store(&self, sender: &str, credential: &Credential) -> SenderResult<()> {
        let entry = Entry::new(&self.service, sender)?;
        entry.set_password(credential.expose())?;
        tracing::info!("Stored credential for {} in system keyring", sender);
        Ok(())
    }

    /// Remove a stored password; missing entries are not an error
    pub fn clear(&self, sender: &str) -> SenderResult<()> {
        let entry = Entry::new(&self.service, sender)?;
        match entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
