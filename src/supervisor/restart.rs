// src/supervisor/restart.rs
//! Restart policy for exited workers
//!
//! The pool consults a policy on every worker exit. The default policy
//! respawns unconditionally with no backoff and no attempt ceiling, which
//! means a worker that crashes on startup is reforked indefinitely; a
//! stricter policy can be substituted without touching the pool's event
//! loop.

use crate::supervisor::WorkerId;

/// What the pool should do about an exited worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Issue one replacement spawn immediately
    Respawn,
    /// Leave the slot empty; the pool shrinks below its desired size
    GiveUp,
}

/// Policy consulted once per worker exit
pub trait RestartPolicy: Send {
    /// Decide the response to `id` exiting with `code` / `signal`
    fn on_exit(
        &mut self,
        id: WorkerId,
        code: Option<i32>,
        signal: Option<i32>,
    ) -> RestartDecision;
}

/// Always respawn, regardless of exit reason
///
/// Matches the behavior of the clustered server entry point: every exit,
/// clean or not, brings one replacement worker online.
#[derive(Debug, Default)]
pub struct AlwaysRespawn;

impl RestartPolicy for AlwaysRespawn {
    fn on_exit(
        &mut self,
        _id: WorkerId,
        _code: Option<i32>,
        _signal: Option<i32>,
    ) -> RestartDecision {
        RestartDecision::Respawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_respawn_ignores_exit_reason() {
        let mut policy = AlwaysRespawn;
        assert_eq!(
            policy.on_exit(WorkerId(1), Some(0), None),
            RestartDecision::Respawn
        );
        assert_eq!(
            policy.on_exit(WorkerId(1), Some(1), None),
            RestartDecision::Respawn
        );
        assert_eq!(
            policy.on_exit(WorkerId(1), None, Some(9)),
            RestartDecision::Respawn
        );
    }
}
