/// Deterministic cancellable timer queue.
///
/// Key properties:
/// - `schedule` returns a handle that `cancel` can retire before it fires.
/// - `advance` fires every due entry in `(due_ms, handle)` order, so two
///   timers due at the same instant fire in scheduling order.
/// - Cancellation does not perturb the order of remaining entries.
///
/// Time is caller-supplied milliseconds; the queue never reads a wall clock.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TimerHandle,
    due_ms: u64,
    token: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_handle: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 1,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `token` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, token: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due_ms: now_ms.saturating_add(delay_ms),
            token,
            canceled: false,
        });
        handle
    }

    /// Returns `true` if the entry was still pending and was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        for entry in &mut self.entries {
            if entry.handle == handle && !entry.canceled {
                entry.canceled = true;
                return true;
            }
        }
        false
    }

    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.canceled).count()
    }

    /// Fire everything due at or before `now_ms`, in `(due_ms, handle)` order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<T> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut rest: Vec<Entry<T>> = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.canceled {
                continue;
            }
            if entry.due_ms <= now_ms {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.entries = rest;

        due.sort_by(|a, b| a.due_ms.cmp(&b.due_ms).then_with(|| a.handle.cmp(&b.handle)));
        due.into_iter().map(|e| e.token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;

    #[test]
    fn fires_only_due_entries() {
        let mut q = TimerQueue::new();
        q.schedule(0, 500, "late");
        q.schedule(0, 100, "early");

        assert_eq!(q.advance(100), vec!["early"]);
        assert_eq!(q.pending(), 1);
        assert_eq!(q.advance(600), vec!["late"]);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut q = TimerQueue::new();
        let h = q.schedule(0, 100, "a");
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(q.advance(1_000).is_empty());
    }

    #[test]
    fn simultaneous_entries_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(0, 100, "first");
        q.schedule(0, 100, "second");
        assert_eq!(q.advance(100), vec!["first", "second"]);
    }
}
