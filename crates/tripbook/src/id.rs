//! Identifier generation for new records.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::Utc;

/// Source of identifiers for newly created records.
pub trait IdGenerator: Send + Sync + std::fmt::Debug {
    /// Produce an id distinct from every id this generator returned before.
    fn next_id(&self) -> String;
}

/// Millisecond-timestamp ids, e.g. `"1718035200123"`.
///
/// This is the format already present in stored collections. When two ids are
/// requested within the same millisecond (or the clock steps backwards) the
/// value is bumped past the last one handed out, so ids stay strictly
/// increasing for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    /// Create a new timestamp generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = if now > last { now } else { last + 1 };
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self) -> String {
        self.next_millis().to_string()
    }
}

/// Deterministic `prefix-N` ids, counting from 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    /// Create a sequential generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_timestamp_ids_are_numeric() {
        let ids = TimestampIds::new();
        let id = ids.next_id();
        assert!(id.parse::<i64>().is_ok(), "not numeric: {id}");
    }

    #[test]
    fn test_timestamp_ids_strictly_increase() {
        let ids = TimestampIds::new();
        let mut previous = ids.next_millis();
        for _ in 0..1_000 {
            let next = ids.next_millis();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_timestamp_ids_unique_across_threads() {
        let ids = std::sync::Arc::new(TimestampIds::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1_000);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("dest");
        assert_eq!(ids.next_id(), "dest-1");
        assert_eq!(ids.next_id(), "dest-2");
        assert_eq!(ids.next_id(), "dest-3");
    }
}
