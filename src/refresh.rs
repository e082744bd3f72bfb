use std::sync::atomic::{AtomicU64, Ordering};

/// Orders overlapping refreshes of the same screen.
///
/// Each refresh takes a ticket from [`RefreshGate::begin`]; when its response
/// arrives it is only applied if no newer refresh has started since.
#[derive(Debug, Default)]
pub struct RefreshGate {
    generation: AtomicU64,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::Acquire) == ticket
    }

    /// `Some(value)` if `ticket` is still the latest refresh, else `None`.
    pub fn accept<T>(&self, ticket: u64, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket, "discarding stale refresh result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_latest_refresh_wins() {
        let gate = RefreshGate::new();
        let first = gate.begin();
        let second = gate.begin();

        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
        assert_eq!(gate.accept(first, "old"), None);
        assert_eq!(gate.accept(second, "new"), Some("new"));
    }

    #[test]
    fn test_no_refresh_started() {
        let gate = RefreshGate::new();
        assert!(!gate.is_current(1));
    }

    #[test]
    fn test_concurrent_tickets_are_unique() {
        let gate = Arc::new(RefreshGate::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || (0..100).map(|_| gate.begin()).collect::<Vec<_>>())
            })
            .collect();

        let mut tickets: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        tickets.sort_unstable();
        tickets.dedup();
        assert_eq!(tickets.len(), 800);
        assert!(gate.is_current(800));
    }
}
