// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

// ============================================================================
// Value Objects
// ============================================================================

/// Username/password pair handed to `mount.cifs`.
///
/// `Debug` redacts the password so requests can be traced safely.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// SHA-256 digest identifying a [`MountRequest`].
///
/// Two requests have the same fingerprint iff they are equivalent, so the
/// mount store keeps fingerprints instead of the requests (and their
/// passwords).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

// ============================================================================
// Mount Request
// ============================================================================

/// Everything that determines what ends up mounted at a target path.
///
/// Requests are compared as a whole: a second publish for the same target
/// path is a replay when every field matches and a conflict otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountRequest {
    /// Local directory the share must appear at
    pub target_path: String,
    /// Network location, e.g. `//server/export`
    pub share: String,
    pub credentials: Credentials,
    /// User supplied `key=value` flags, in the order they were given
    pub mount_flags: Vec<String>,
}

impl MountRequest {
    pub fn new(
        target_path: impl Into<String>,
        share: impl Into<String>,
        credentials: Credentials,
        mount_flags: Vec<String>,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            share: share.into(),
            credentials,
            mount_flags,
        }
    }

    /// Digest of the canonical JSON encoding of this request.
    pub fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        let encoded = serde_json::to_vec(self)?;
        Ok(Fingerprint(Sha256::digest(&encoded).into()))
    }
}
