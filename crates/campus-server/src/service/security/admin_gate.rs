//! Admin password gate.
//!
//! The dashboard password is server-side configuration; admin routes
//! present it in a header and the gate compares SHA-256 digests, so the
//! comparison length never depends on the configured secret.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Verifies the admin password presented by dashboard requests.
#[derive(Clone)]
pub struct AdminGate {
    digest: Arc<[u8; 32]>,
}

impl AdminGate {
    /// Creates a gate for the configured admin password.
    pub fn new(password: &str) -> Self {
        Self {
            digest: Arc::new(Self::digest(password)),
        }
    }

    /// Returns whether the presented password matches the configured one.
    pub fn verify(&self, presented: &str) -> bool {
        Self::digest(presented) == *self.digest
    }

    fn digest(password: &str) -> [u8; 32] {
        Sha256::digest(password.as_bytes()).into()
    }
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_password() {
        let gate = AdminGate::new("apmf2025");
        assert!(gate.verify("apmf2025"));
    }

    #[test]
    fn rejects_wrong_password() {
        let gate = AdminGate::new("apmf2025");
        assert!(!gate.verify("apmf2024"));
        assert!(!gate.verify(""));
        assert!(!gate.verify("apmf2025 "));
    }

    #[test]
    fn debug_does_not_leak_digest() {
        let gate = AdminGate::new("topsecret");
        let rendered = format!("{:?}", gate);
        assert!(!rendered.contains("topsecret"));
        assert!(!rendered.contains("digest"));
    }
}
