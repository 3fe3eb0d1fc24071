// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Scriptable fakes for the command, host and store seams.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use smb_csi_core::domain::command::{Command, CommandError, CommandRunner};
use smb_csi_core::domain::driver_config::DriverConfig;
use smb_csi_core::domain::host::{HostError, HostFilesystem};
use smb_csi_core::domain::mount::MountRequest;
use smb_csi_core::domain::mount_store::{Lookup, MountStore, StoreError};
use smb_csi_core::infrastructure::InMemoryMountStore;
use smb_csi_core::presentation::grpc::{build_node_service, CsiNodeService};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Default)]
struct RunnerState {
    invocations: Mutex<Vec<Invocation>>,
    combined_output_calls: AtomicUsize,
    start_calls: AtomicUsize,
    wait_calls: AtomicUsize,
    output_error: Mutex<Option<String>>,
    start_error: Mutex<Option<String>>,
    wait_error: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    wait_delay: Mutex<Option<Duration>>,
}

/// Records every command and fails on demand
#[derive(Clone, Default)]
pub struct FakeCommandRunner {
    state: Arc<RunnerState>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.invocations.lock().clone()
    }

    pub fn combined_output_calls(&self) -> usize {
        self.state.combined_output_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.state.start_calls.load(Ordering::SeqCst)
    }

    pub fn wait_calls(&self) -> usize {
        self.state.wait_calls.load(Ordering::SeqCst)
    }

    pub fn fail_output(&self, output: Option<&str>) {
        *self.state.output_error.lock() = output.map(str::to_string);
    }

    pub fn fail_start(&self, message: Option<&str>) {
        *self.state.start_error.lock() = message.map(str::to_string);
    }

    pub fn fail_wait(&self, message: Option<&str>) {
        *self.state.wait_error.lock() = message.map(str::to_string);
    }

    /// Slow every combined_output call down to widen race windows
    pub fn delay_output(&self, delay: Duration) {
        *self.state.delay.lock() = Some(delay);
    }

    pub fn delay_wait(&self, delay: Duration) {
        *self.state.wait_delay.lock() = Some(delay);
    }
}

impl CommandRunner for FakeCommandRunner {
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Command> {
        self.state.invocations.lock().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });
        Box::new(FakeCommand {
            program: program.to_string(),
            state: self.state.clone(),
        })
    }
}

struct FakeCommand {
    program: String,
    state: Arc<RunnerState>,
}

#[async_trait]
impl Command for FakeCommand {
    fn start(&mut self) -> Result<(), CommandError> {
        self.state.start_calls.fetch_add(1, Ordering::SeqCst);
        match self.state.start_error.lock().clone() {
            Some(message) => Err(CommandError::Spawn {
                program: self.program.clone(),
                source: std::io::Error::other(message),
            }),
            None => Ok(()),
        }
    }

    async fn wait(&mut self) -> Result<(), CommandError> {
        self.state.wait_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.state.wait_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.state.wait_error.lock().clone();
        match failure {
            Some(message) => Err(CommandError::Wait {
                program: self.program.clone(),
                source: std::io::Error::other(message),
            }),
            None => Ok(()),
        }
    }

    async fn combined_output(&mut self) -> Result<Vec<u8>, CommandError> {
        self.state.combined_output_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.state.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.state.output_error.lock().clone();
        match failure {
            Some(output) => Err(CommandError::Exit {
                program: self.program.clone(),
                status: "exit status: 32".to_string(),
                output,
            }),
            None => Ok(b"mounted".to_vec()),
        }
    }
}

// ============================================================================
// Host
// ============================================================================

struct HostState {
    created: Mutex<Vec<PathBuf>>,
    removed: Mutex<Vec<PathBuf>>,
    create_error: Mutex<Option<String>>,
    remove_error: Mutex<Option<String>>,
    hostname: Mutex<Result<String, String>>,
}

#[derive(Clone)]
pub struct FakeHost {
    state: Arc<HostState>,
}

impl Default for FakeHost {
    fn default() -> Self {
        let state = HostState {
            created: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            create_error: Mutex::new(None),
            remove_error: Mutex::new(None),
            hostname: Mutex::new(Ok("some-host-name".to_string())),
        };
        Self {
            state: Arc::new(state),
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<PathBuf> {
        self.state.created.lock().clone()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.state.removed.lock().clone()
    }

    pub fn fail_create(&self, message: Option<&str>) {
        *self.state.create_error.lock() = message.map(str::to_string);
    }

    pub fn fail_remove(&self, message: Option<&str>) {
        *self.state.remove_error.lock() = message.map(str::to_string);
    }

    pub fn set_hostname(&self, hostname: Result<&str, &str>) {
        *self.state.hostname.lock() = hostname.map(str::to_string).map_err(str::to_string);
    }
}

#[async_trait]
impl HostFilesystem for FakeHost {
    async fn create_dir_all(&self, path: &Path) -> Result<(), HostError> {
        self.state.created.lock().push(path.to_path_buf());
        match self.state.create_error.lock().clone() {
            Some(message) => Err(HostError::Io(std::io::Error::other(message))),
            None => Ok(()),
        }
    }

    async fn remove(&self, path: &Path) -> Result<(), HostError> {
        self.state.removed.lock().push(path.to_path_buf());
        match self.state.remove_error.lock().clone() {
            Some(message) => Err(HostError::Io(std::io::Error::other(message))),
            None => Ok(()),
        }
    }

    fn hostname(&self) -> Result<String, HostError> {
        self.state
            .hostname
            .lock()
            .clone()
            .map_err(|message| HostError::Io(std::io::Error::other(message)))
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
struct StoreState {
    inner: InMemoryMountStore,
    lookup_calls: AtomicUsize,
    record_calls: AtomicUsize,
    removed: Mutex<Vec<String>>,
    lookup_error: Mutex<Option<String>>,
    record_error: Mutex<Option<String>>,
}

/// Real in-memory semantics plus call counting and injected failures
#[derive(Clone, Default)]
pub struct FakeMountStore {
    state: Arc<StoreState>,
}

impl FakeMountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_calls(&self) -> usize {
        self.state.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn record_calls(&self) -> usize {
        self.state.record_calls.load(Ordering::SeqCst)
    }

    pub fn removed(&self) -> Vec<String> {
        self.state.removed.lock().clone()
    }

    pub fn contains(&self, target_path: &str) -> bool {
        self.state.inner.contains(target_path)
    }

    pub fn fail_lookup(&self, message: Option<&str>) {
        *self.state.lookup_error.lock() = message.map(str::to_string);
    }

    pub fn fail_record(&self, message: Option<&str>) {
        *self.state.record_error.lock() = message.map(str::to_string);
    }
}

#[async_trait]
impl MountStore for FakeMountStore {
    async fn lookup(
        &self,
        target_path: &str,
        candidate: &MountRequest,
    ) -> Result<Lookup, StoreError> {
        self.state.lookup_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.state.lookup_error.lock().clone();
        if let Some(message) = failure {
            return Err(StoreError::Backend(message));
        }
        self.state.inner.lookup(target_path, candidate).await
    }

    async fn record(&self, target_path: &str, request: &MountRequest) -> Result<(), StoreError> {
        self.state.record_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.state.record_error.lock().clone();
        if let Some(message) = failure {
            return Err(StoreError::Backend(message));
        }
        self.state.inner.record(target_path, request).await
    }

    async fn remove(&self, target_path: &str) {
        self.state.removed.lock().push(target_path.to_string());
        self.state.inner.remove(target_path).await;
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub runner: FakeCommandRunner,
    pub host: FakeHost,
    pub store: FakeMountStore,
    pub node: CsiNodeService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(DriverConfig::default())
    }

    pub fn with_config(config: DriverConfig) -> Self {
        let runner = FakeCommandRunner::new();
        let host = FakeHost::new();
        let store = FakeMountStore::new();
        let node = build_node_service(
            &config,
            Arc::new(runner.clone()),
            Arc::new(host.clone()),
            Arc::new(store.clone()),
        );
        Self {
            runner,
            host,
            store,
            node,
        }
    }
}

// ============================================================================
// Logs
// ============================================================================

/// In-memory sink for `tracing` output
#[derive(Clone, Default)]
pub struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events on the current thread here until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buffer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
