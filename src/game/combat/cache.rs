// Single-slot attack input buffer

/// Remembers the time of the most recent attack press made while an attack
/// was already playing. Only one slot exists: a newer press overwrites it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputCache {
    last_input_time: Option<f32>,
}

impl InputCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a press made at `now` (last writer wins)
    pub fn record(&mut self, now: f32) {
        self.last_input_time = Some(now);
    }

    /// True when a press is buffered and `now - press <= tolerance`.
    /// An empty slot is never fresh.
    pub fn is_fresh(&self, now: f32, tolerance: f32) -> bool {
        self.last_input_time
            .is_some_and(|time| now - time <= tolerance)
    }

    /// Consume the buffered press if it is fresh
    pub fn take_if_fresh(&mut self, now: f32, tolerance: f32) -> bool {
        if self.is_fresh(now, tolerance) {
            self.last_input_time = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.last_input_time = None;
    }

    pub fn last_input_time(&self) -> Option<f32> {
        self.last_input_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_never_fresh() {
        let cache = InputCache::new();
        assert_eq!(cache.last_input_time(), None);
        assert!(!cache.is_fresh(0.0, 10.0));
        assert!(!cache.is_fresh(0.3, 0.5));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mut cache = InputCache::new();
        cache.record(1.0);
        assert!(cache.is_fresh(1.5, 0.5));
        assert!(!cache.is_fresh(1.5001, 0.5));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut cache = InputCache::new();
        cache.record(0.2);
        cache.record(0.9);
        assert_eq!(cache.last_input_time(), Some(0.9));
        assert!(cache.is_fresh(1.3, 0.45));
    }

    #[test]
    fn test_take_consumes_once() {
        let mut cache = InputCache::new();
        cache.record(0.4);
        assert!(cache.take_if_fresh(0.6, 0.5));
        assert!(!cache.take_if_fresh(0.6, 0.5));
        assert_eq!(cache.last_input_time(), None);
    }

    #[test]
    fn test_stale_take_keeps_slot() {
        let mut cache = InputCache::new();
        cache.record(0.0);
        assert!(!cache.take_if_fresh(2.0, 0.5));
        assert_eq!(cache.last_input_time(), Some(0.0));

        cache.clear();
        assert_eq!(cache.last_input_time(), None);
    }
}
