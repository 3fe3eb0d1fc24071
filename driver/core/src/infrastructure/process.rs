// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `tokio::process` backed command execution.

use crate::domain::command::{Command, CommandError, CommandRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Child;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for TokioCommandRunner {
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Command> {
        Box::new(TokioCommand::new(program, args))
    }
}

pub struct TokioCommand {
    program: String,
    command: tokio::process::Command,
    child: Option<Child>,
}

impl TokioCommand {
    pub fn new(program: &str, args: &[String]) -> Self {
        let mut command = tokio::process::Command::new(program);
        // A dropped request must not kill a half-finished mount
        command.args(args).stdin(Stdio::null()).kill_on_drop(false);

        Self {
            program: program.to_string(),
            command,
            child: None,
        }
    }
}

#[async_trait]
impl Command for TokioCommand {
    fn start(&mut self) -> Result<(), CommandError> {
        if self.child.is_some() {
            return Err(CommandError::AlreadyStarted {
                program: self.program.clone(),
            });
        }

        let child = self.command.spawn().map_err(|source| CommandError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        self.child = Some(child);
        Ok(())
    }

    async fn wait(&mut self) -> Result<(), CommandError> {
        let program = self.program.clone();
        let child = self
            .child
            .as_mut()
            .ok_or_else(|| CommandError::NotStarted {
                program: program.clone(),
            })?;

        let status = child
            .wait()
            .await
            .map_err(|source| CommandError::Wait {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Exit {
                program,
                status: status.to_string(),
                output: String::new(),
            })
        }
    }

    async fn combined_output(&mut self) -> Result<Vec<u8>, CommandError> {
        if self.child.is_some() {
            return Err(CommandError::AlreadyStarted {
                program: self.program.clone(),
            });
        }

        let output = self
            .command
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CommandError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            })
        }
    }
}
