//! Scoped suppression of recompute handling.
//!
//! While the editor replays or rebuilds child features, the host's
//! recompute callback must not run the synthesis again. Holding a
//! guard from [`ComputeGate::suspend`] marks the gate suspended; the
//! mark is released when the guard drops, on every exit path.

use std::cell::Cell;

#[derive(Debug, Default)]
pub struct ComputeGate {
    suspensions: Cell<u32>,
}

impl ComputeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspensions.get() > 0
    }

    /// Suspends recompute until the returned guard is dropped. Guards
    /// nest; the gate resumes when the last one goes.
    #[must_use]
    pub fn suspend(&self) -> SuspendGuard<'_> {
        self.suspensions.set(self.suspensions.get() + 1);
        SuspendGuard { gate: self }
    }
}

pub struct SuspendGuard<'a> {
    gate: &'a ComputeGate,
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        self.gate.suspensions.set(self.gate.suspensions.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_scopes_the_suspension() {
        let gate = ComputeGate::new();
        assert!(!gate.is_suspended());
        {
            let _guard = gate.suspend();
            assert!(gate.is_suspended());
        }
        assert!(!gate.is_suspended());
    }

    #[test]
    fn guards_nest() {
        let gate = ComputeGate::new();
        let outer = gate.suspend();
        {
            let _inner = gate.suspend();
            assert!(gate.is_suspended());
        }
        assert!(gate.is_suspended());
        drop(outer);
        assert!(!gate.is_suspended());
    }
}
