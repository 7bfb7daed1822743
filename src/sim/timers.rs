//! Deferred effects keyed by simulation time
//!
//! Timed transitions (wobble end, invincibility end, the game-over delay,
//! countdown steps) are queued here and fired by the tick that reaches
//! their due time. Clearing the queue cancels them all.

/// A state change that happens some time after it is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Countdown shows its next value
    CountdownStep,
    /// Countdown finished; play begins
    Launch,
    WobbleEnd,
    InvincibilityEnd,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    effect: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to fire once the clock reaches `due_ms`
    pub fn schedule(&mut self, effect: Deferred, due_ms: f64) {
        self.queue.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            effect,
        });
        self.next_seq += 1;
    }

    /// Replace any pending `effect` with a new due time
    pub fn reschedule(&mut self, effect: Deferred, due_ms: f64) {
        self.cancel(effect);
        self.schedule(effect, due_ms);
    }

    /// Drop every pending instance of `effect`
    pub fn cancel(&mut self, effect: Deferred) {
        self.queue.retain(|s| s.effect != effect);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_pending(&self, effect: Deferred) -> bool {
        self.queue.iter().any(|s| s.effect == effect)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the earliest effect due at `now_ms`, with its due time.
    ///
    /// Ties fire in scheduling order. Effects scheduled while draining are
    /// picked up by later calls if they are already due.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(Deferred, f64)> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        let s = self.queue.remove(idx);
        Some((s.effect, s.due_ms))
    }
}
