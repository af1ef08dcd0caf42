//! Values read from remote or durable state, tagged with how they were obtained.

/// Result of a read that never fails outright.
///
/// Remote and durable reads fall back to a last-known or conservative value
/// instead of propagating errors; `Degraded` keeps that fallback visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading<T> {
    /// Read from the system of record just now
    Fresh(T),
    /// Served from a local cache within its freshness window
    Cached(T),
    /// The read failed; `value` is the stale or default fallback
    Degraded { value: T, reason: String },
}

impl<T> Reading<T> {
    pub fn value(&self) -> &T {
        match self {
            Reading::Fresh(v) | Reading::Cached(v) => v,
            Reading::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Reading::Fresh(v) | Reading::Cached(v) => v,
            Reading::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Reading::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_keeps_fallback_value() {
        let reading = Reading::Degraded {
            value: 7,
            reason: "timeout".to_string(),
        };
        assert!(reading.is_degraded());
        assert_eq!(*reading.value(), 7);
        assert_eq!(reading.into_value(), 7);
    }

    #[test]
    fn test_fresh_and_cached_are_not_degraded() {
        assert!(!Reading::Fresh(1).is_degraded());
        assert!(!Reading::Cached(1).is_degraded());
    }
}
