// src/supervisor/pool.rs
//! Fixed-size worker pool supervisor
//!
//! The pool issues `desired_size` spawns at startup, then handles
//! online/exit notifications for the lifetime of the coordinator. Its
//! entire failure-recovery behavior is: remove the exited worker's record,
//! report the exit, and ask the restart policy for one replacement. Worker
//! failures are never escalated to the caller.
//!
//! Except for the instant between removing an exited worker and issuing
//! its replacement, the pool always tracks exactly `desired_size` workers.

use crate::supervisor::restart::{AlwaysRespawn, RestartDecision, RestartPolicy};
use crate::supervisor::{WorkerEvent, WorkerId, WorkerState};
use crate::utils::errors::{Result, StrutError};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capability to create one new worker
///
/// Spawning is fire-and-forget from the pool's perspective: the identity
/// comes back immediately, and the worker's online/exit notifications
/// arrive later on the pool's event channel.
pub trait WorkerSpawner: Send {
    fn spawn(&mut self) -> Result<WorkerId>;
}

/// Sink for pool lifecycle observations
///
/// The pool reports every online and exit occurrence here and never
/// inspects or reacts to what the sink does with them.
pub trait PoolObserver: Send {
    fn worker_online(&mut self, id: WorkerId);
    fn worker_exit(&mut self, id: WorkerId, code: Option<i32>, signal: Option<i32>);
}

/// Default observer: structured log lines
#[derive(Debug, Default)]
pub struct LogObserver;

impl PoolObserver for LogObserver {
    fn worker_online(&mut self, id: WorkerId) {
        info!(worker = %id, "worker online");
    }

    fn worker_exit(&mut self, id: WorkerId, code: Option<i32>, signal: Option<i32>) {
        info!(worker = %id, ?code, ?signal, "worker exited");
    }
}

/// Supervisor for a fixed-size pool of worker processes
pub struct WorkerPool {
    /// Target number of live workers, fixed at construction
    desired_size: usize,

    /// Tracked workers; insertion order is irrelevant
    workers: HashMap<WorkerId, WorkerState>,

    /// Spawn capability
    spawner: Box<dyn WorkerSpawner>,

    /// Observation sink
    observer: Box<dyn PoolObserver>,

    /// Response to worker exits
    policy: Box<dyn RestartPolicy>,
}

impl WorkerPool {
    /// Create a pool supervisor
    ///
    /// Fails with a configuration error before anything is spawned when
    /// `desired_size` is zero.
    pub fn new(desired_size: usize, spawner: Box<dyn WorkerSpawner>) -> Result<Self> {
        if desired_size < 1 {
            return Err(StrutError::Configuration(
                "worker pool size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            desired_size,
            workers: HashMap::with_capacity(desired_size),
            spawner,
            observer: Box::new(LogObserver),
            policy: Box::new(AlwaysRespawn),
        })
    }

    /// Replace the observation sink
    pub fn with_observer(mut self, observer: Box<dyn PoolObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the restart policy
    pub fn with_policy(mut self, policy: Box<dyn RestartPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Issue the initial `desired_size` spawns
    ///
    /// Spawns are issued back to back without waiting for any worker to
    /// report online; all startup sequences run concurrently.
    pub fn start(&mut self) -> Result<()> {
        info!("starting worker pool with {} workers", self.desired_size);
        for _ in 0..self.desired_size {
            self.spawn_one()?;
        }
        Ok(())
    }

    /// Spawn one worker and record it as starting
    fn spawn_one(&mut self) -> Result<()> {
        let id = self.spawner.spawn()?;
        debug!(worker = %id, "spawned worker");
        self.workers.insert(id, WorkerState::Starting);
        Ok(())
    }

    /// Handle one worker notification
    ///
    /// Called with events in arrival order, never concurrently.
    pub fn handle_event(&mut self, event: WorkerEvent) -> Result<()> {
        match event {
            WorkerEvent::Online { id } => {
                match self.workers.get_mut(&id) {
                    Some(state @ WorkerState::Starting) => {
                        *state = WorkerState::Online;
                        self.observer.worker_online(id);
                    }
                    Some(WorkerState::Online) => {
                        warn!(worker = %id, "duplicate online notification ignored");
                    }
                    None => {
                        warn!(worker = %id, "online notification for unknown worker");
                    }
                }
                Ok(())
            }
            WorkerEvent::Exit { id, code, signal } => {
                if self.workers.remove(&id).is_none() {
                    warn!(worker = %id, "exit notification for unknown worker");
                    return Ok(());
                }
                self.observer.worker_exit(id, code, signal);

                match self.policy.on_exit(id, code, signal) {
                    RestartDecision::Respawn => self.spawn_one(),
                    RestartDecision::GiveUp => {
                        warn!(worker = %id, "restart policy gave up on worker slot");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Run the supervision loop until the event channel closes
    pub async fn run(mut self, mut events: mpsc::Receiver<WorkerEvent>) -> Result<()> {
        self.start()?;
        while let Some(event) = events.recv().await {
            self.handle_event(event)?;
        }
        // All event senders dropped; nothing left to supervise
        debug!("worker event channel closed, supervisor loop ending");
        Ok(())
    }

    /// Number of currently tracked workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Target pool size
    pub fn desired_size(&self) -> usize {
        self.desired_size
    }

    /// State of one tracked worker, if known
    pub fn worker_state(&self, id: WorkerId) -> Option<WorkerState> {
        self.workers.get(&id).copied()
    }
}
