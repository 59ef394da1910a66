// src/supervisor/process.rs
//! Process-backed spawn capability
//!
//! Spawns workers by re-executing the current binary with the worker-role
//! environment flag set, the portable equivalent of a cluster fork. Each
//! child gets a watcher task that translates its lifecycle into pool
//! events:
//!
//! - first ready sentinel line on stdout -> `WorkerEvent::Online`
//! - process termination -> `WorkerEvent::Exit` with code and signal
//!
//! Remaining stdout lines are forwarded to the coordinator's log.

use crate::supervisor::{WorkerEvent, WorkerId, READY_SENTINEL, WORKER_ROLE_ENV};
use crate::supervisor::pool::WorkerSpawner;
use crate::utils::errors::{Result, StrutError};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Shared registry of live worker pids
///
/// The spawner adds a pid on spawn and its watcher removes it on exit;
/// the server uses it to signal workers when the coordinator shuts down.
pub type ChildTracker = Arc<Mutex<HashSet<u32>>>;

/// Send SIGTERM to every tracked worker, best effort
pub fn terminate_all(tracker: &ChildTracker) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pids: Vec<u32> = tracker.lock().unwrap().iter().copied().collect();
    for pid in pids {
        debug!(pid, "sending SIGTERM to worker");
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, "failed to signal worker: {}", e);
        }
    }
}

/// Spawner that re-executes the current binary in the worker role
pub struct ProcessSpawner {
    /// Absolute path of the running binary
    program: PathBuf,

    /// Arguments to re-execute with (the original command line)
    args: Vec<OsString>,

    /// Channel the watcher tasks report worker events on
    events: mpsc::Sender<WorkerEvent>,

    /// Live worker pids, shared with the server for shutdown signalling
    children: ChildTracker,
}

impl ProcessSpawner {
    /// Create a spawner that reruns the current command line
    pub fn new(events: mpsc::Sender<WorkerEvent>) -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| StrutError::SpawnFailed(format!("cannot resolve own binary: {}", e)))?;
        let args = std::env::args_os().skip(1).collect();

        Ok(Self {
            program,
            args,
            events,
            children: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Handle to the live-pid registry
    pub fn children(&self) -> ChildTracker {
        Arc::clone(&self.children)
    }

    /// Watch one child: report online on the ready sentinel, exit on
    /// termination
    async fn watch(
        mut child: tokio::process::Child,
        id: WorkerId,
        events: mpsc::Sender<WorkerEvent>,
        children: ChildTracker,
    ) {
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            let mut online_sent = false;
            while let Ok(Some(line)) = lines.next_line().await {
                if !online_sent && line.trim() == READY_SENTINEL {
                    online_sent = true;
                    let _ = events.send(WorkerEvent::Online { id }).await;
                } else {
                    debug!(worker = %id, "{}", line);
                }
            }
        }

        // Stdout hit EOF; the process is exiting or already gone
        let (code, signal) = match child.wait().await {
            Ok(status) => {
                use std::os::unix::process::ExitStatusExt;
                (status.code(), status.signal())
            }
            Err(e) => {
                warn!(worker = %id, "failed to reap worker: {}", e);
                (None, None)
            }
        };

        children.lock().unwrap().remove(&id.0);
        let _ = events.send(WorkerEvent::Exit { id, code, signal }).await;
    }
}

impl WorkerSpawner for ProcessSpawner {
    fn spawn(&mut self) -> Result<WorkerId> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env(WORKER_ROLE_ENV, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let child = command
            .spawn()
            .map_err(|e| StrutError::SpawnFailed(format!("failed to spawn worker: {}", e)))?;

        let pid = child
            .id()
            .ok_or_else(|| StrutError::SpawnFailed("worker exited before pid was read".into()))?;
        let id = WorkerId(pid);

        self.children.lock().unwrap().insert(pid);
        tokio::spawn(Self::watch(
            child,
            id,
            self.events.clone(),
            Arc::clone(&self.children),
        ));

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawner_captures_command_line() {
        let (tx, _rx) = mpsc::channel(4);
        let spawner = ProcessSpawner::new(tx).unwrap();
        assert!(spawner.program.is_absolute());
        // The test binary's own argv minus the program name
        assert_eq!(spawner.args.len(), std::env::args_os().count() - 1);
    }

    #[tokio::test]
    async fn test_tracker_starts_empty() {
        let (tx, _rx) = mpsc::channel(4);
        let spawner = ProcessSpawner::new(tx).unwrap();
        assert!(spawner.children().lock().unwrap().is_empty());
    }
}
