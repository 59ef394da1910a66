// src/supervisor/mod.rs
//! Worker process supervision
//!
//! This module owns the lifecycle of the universal server's worker
//! processes:
//!
//! - **WorkerPool**: fixed-size pool that respawns any worker that exits
//! - **ProcessSpawner**: spawn capability backed by re-executing the
//!   current binary in the worker role
//! - **RestartPolicy**: pluggable response to worker exits
//!
//! # Architecture
//!
//! ```text
//! Coordinator process                       Worker processes
//! ┌──────────────────────────┐              ┌────────────┐
//! │ WorkerPool               │── spawn ───> │ Worker #1  │
//! │  workers: id -> state    │              ├────────────┤
//! │  policy:  AlwaysRespawn  │<── online ── │ Worker #2  │
//! │  observer: tracing sink  │<── exit ──── ├────────────┤
//! └──────────────────────────┘              │ Worker #N  │
//!        one mpsc channel,                  └────────────┘
//!        events handled one at a time        all bind the same port
//! ```
//!
//! The coordinator never blocks on worker startup and processes
//! online/exit notifications strictly one at a time, so the worker map
//! needs no synchronization.

pub mod pool;
pub mod process;
pub mod restart;

pub use pool::{PoolObserver, WorkerPool, WorkerSpawner};
pub use process::ProcessSpawner;
pub use restart::{AlwaysRespawn, RestartDecision, RestartPolicy};

/// Environment flag that marks a process as a worker
///
/// Set by the coordinator on every child it spawns; its presence is the
/// runtime's role signal, translated into an explicit [`Role`] exactly
/// once at process startup.
pub const WORKER_ROLE_ENV: &str = "STRUT_WORKER";

/// Line a worker writes to stdout once its listener is bound
pub const READY_SENTINEL: &str = "__strut_worker_online__";

/// Role of the current process in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Spawns and supervises workers; serves nothing itself
    Coordinator,
    /// Serves the shared port; never spawns. Terminal: a worker never
    /// becomes a coordinator
    Worker,
}

impl Role {
    /// Detect the current process role from the environment
    pub fn from_env() -> Self {
        if std::env::var_os(WORKER_ROLE_ENV).is_some() {
            Role::Worker
        } else {
            Role::Coordinator
        }
    }
}

/// Opaque identity of a worker process, assigned at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub u32);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a tracked worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Spawn issued, online notification not yet observed
    Starting,
    /// Worker reported itself serving
    Online,
}

/// Notification from the host runtime about one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Worker reported it is serving the shared port
    Online { id: WorkerId },
    /// Worker process terminated, for any reason
    Exit {
        id: WorkerId,
        code: Option<i32>,
        signal: Option<i32>,
    },
}
