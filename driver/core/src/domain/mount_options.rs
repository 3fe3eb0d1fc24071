// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mount Option Validator Domain Service
//!
//! Builds the `-o` argument for `mount -t cifs` from the request credentials
//! and user supplied mount flags. Only a fixed whitelist of flags is accepted,
//! and no value may contain the option separator, so a flag can never smuggle
//! extra options onto the command line.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements internal responsibilities for mount options

use crate::domain::mount::Credentials;
use thiserror::Error;

/// Separator `mount.cifs` uses between options
pub const OPTION_SEPARATOR: &str = ",";

/// Flag keys a publish request may carry
pub const ALLOWED_MOUNT_FLAGS: &[&str] = &["vers", "uid", "gid"];

/// Mount option validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountOptionError {
    #[error("mount flag [{0}] is not of the form key=value")]
    Malformed(String),

    #[error("mount flag [{0}] is not permitted")]
    NotPermitted(String),

    #[error("mount flag [{0}] contains a forbidden character")]
    ForbiddenCharacter(String),

    #[error("mount flag [{0}] has an empty value")]
    EmptyValue(String),

    #[error("mount flag [{0}] requires a numeric value")]
    NotNumeric(String),

    // Never carries the value itself: it may be a password.
    #[error("credential [{0}] contains a forbidden character")]
    CredentialSeparator(&'static str),
}

/// Mount option validator domain service
///
/// # Security Guarantees
/// - Rejects flag keys outside [`ALLOWED_MOUNT_FLAGS`]
/// - Rejects any flag value or credential containing [`OPTION_SEPARATOR`]
/// - Requires `uid`/`gid` values to be decimal
pub struct MountOptionValidator {
    allowed_keys: &'static [&'static str],
}

impl MountOptionValidator {
    pub fn new() -> Self {
        Self {
            allowed_keys: ALLOWED_MOUNT_FLAGS,
        }
    }

    /// Render the full option string for a mount.
    ///
    /// The result is `username=<u>,password=<p>` followed by every flag in
    /// its original order.
    ///
    /// # Examples
    /// ```
    /// use smb_csi_core::domain::mount::Credentials;
    /// use smb_csi_core::domain::mount_options::MountOptionValidator;
    ///
    /// let validator = MountOptionValidator::new();
    /// let credentials = Credentials::new("user1", "pass1");
    ///
    /// let options = validator.build(&credentials, &["vers=3.0".to_string()]).unwrap();
    /// assert_eq!(options, "username=user1,password=pass1,vers=3.0");
    ///
    /// assert!(validator.build(&credentials, &["vers=1.0,".to_string()]).is_err());
    /// ```
    pub fn build(
        &self,
        credentials: &Credentials,
        mount_flags: &[String],
    ) -> Result<String, MountOptionError> {
        for (field, value) in [
            ("username", &credentials.username),
            ("password", &credentials.password),
        ] {
            if value.contains(OPTION_SEPARATOR) {
                return Err(MountOptionError::CredentialSeparator(field));
            }
        }

        let mut options = Vec::with_capacity(mount_flags.len() + 2);
        options.push(format!("username={}", credentials.username));
        options.push(format!("password={}", credentials.password));

        for flag in mount_flags {
            self.validate_flag(flag)?;
            options.push(flag.clone());
        }

        Ok(options.join(OPTION_SEPARATOR))
    }

    /// Check a single `key=value` flag against the whitelist.
    pub fn validate_flag(&self, flag: &str) -> Result<(), MountOptionError> {
        let (key, value) = flag
            .split_once('=')
            .ok_or_else(|| MountOptionError::Malformed(flag.to_string()))?;

        if !self.allowed_keys.contains(&key) {
            tracing::warn!(flag = %flag, "Rejected mount flag outside whitelist");
            return Err(MountOptionError::NotPermitted(key.to_string()));
        }

        if value.contains(OPTION_SEPARATOR) {
            tracing::warn!(flag = %flag, "Rejected mount flag containing option separator");
            return Err(MountOptionError::ForbiddenCharacter(flag.to_string()));
        }

        if value.is_empty() {
            return Err(MountOptionError::EmptyValue(key.to_string()));
        }

        if matches!(key, "uid" | "gid") && !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MountOptionError::NotNumeric(flag.to_string()));
        }

        Ok(())
    }
}

impl Default for MountOptionValidator {
    fn default() -> Self {
        Self::new()
    }
}
