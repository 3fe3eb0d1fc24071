// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command Execution Capability
//!
//! The only way the core touches `mount`/`umount`. Keeping it behind a trait
//! lets the orchestrators be exercised without root or a share server.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} was not started")]
    NotStarted { program: String },

    #[error("{program} was already started")]
    AlreadyStarted { program: String },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit {
        program: String,
        status: String,
        /// Combined stdout/stderr, when it was captured
        output: String,
    },
}

impl CommandError {
    /// Whatever the command printed before failing
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::Exit { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

/// Factory for external processes
pub trait CommandRunner: Send + Sync {
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Command>;
}

/// A single external process invocation.
///
/// Either `start` followed by `wait`, or `combined_output` on its own.
#[async_trait]
pub trait Command: Send {
    /// Spawn the process without waiting for it
    fn start(&mut self) -> Result<(), CommandError>;

    /// Wait for a started process; a non-zero exit is an error
    async fn wait(&mut self) -> Result<(), CommandError>;

    /// Run the process to completion and return stdout followed by stderr.
    /// A non-zero exit is an error that still carries the output.
    async fn combined_output(&mut self) -> Result<Vec<u8>, CommandError>;
}
