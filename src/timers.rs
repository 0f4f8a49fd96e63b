use std::time::Duration;

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Tick,
    RegularFood,
    SpecialFood,
}

/// Identifies one scheduled firing. Handles are never reused, so a handle
/// from before a cancel can't be mistaken for its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    kind: TimerKind,
    deadline: Duration,
}

/// Single-fire timers over a virtual clock. While due timers are being
/// drained the clock sits on the deadline of the one that just fired, so
/// anything re-armed from its callback counts from when it was due.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        trace!("timer {handle:?} ({kind:?}) due at {deadline:?}");
        self.pending.push(Pending {
            handle,
            kind,
            deadline,
        });
        handle
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        before != self.pending.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Moves the clock forward. Going backwards is ignored.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Removes and returns the earliest timer due by `until`, oldest first on
    /// ties, and moves the clock to its deadline. Call [`Scheduler::advance_to`]
    /// with `until` once nothing is left to fire.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerKind)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.handle))
            .map(|(i, _)| i)?;
        let fired = self.pending.swap_remove(index);
        self.now = self.now.max(fired.deadline);
        Some((fired.handle, fired.kind))
    }
}
