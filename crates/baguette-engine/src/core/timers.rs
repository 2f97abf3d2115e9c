// core/timers.rs
//
// Delayed one-shot callbacks keyed by TimerId.
// Payloads are plain data; the game decides what a fired payload means.
//
// Usage:
//   let mut timers = TimerQueue::new();
//   let id = timers.schedule(now, 200.0, Stage::Watch);
//   timers.cancel(id);                 // never fires
//   while let Some((at, payload)) = timers.pop_due(now) { ... }

/// Handle to a scheduled timer for later cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    fire_at_ms: f64,
    payload: T,
}

/// Pending delayed callbacks.
///
/// Fire order is by due time, ties broken by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire `delay_ms` after `now_ms`. Returns a handle for later control.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            fire_at_ms: now_ms + delay_ms.max(0.0),
            payload,
        });
        id
    }

    /// Cancel a timer by handle. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        let removed = self.timers.len() != before;
        if !removed {
            log::trace!("cancel: timer {} already gone", id.0);
        }
        removed
    }

    /// Remove and return the earliest timer due at or before `now_ms`,
    /// together with its nominal fire time.
    ///
    /// Callers loop until `None`; a timer scheduled while handling a popped
    /// one is returned by a later pop in the same loop if it is already due.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, T)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.fire_at_ms.total_cmp(&b.fire_at_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        Some((timer.fire_at_ms, timer.payload))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether there are no pending timers.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
