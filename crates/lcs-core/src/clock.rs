use chrono::{TimeZone, Utc};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of wall-clock time in Unix epoch milliseconds.
///
/// Readings are timestamped through this trait so tests can drive the
/// accumulator with a manual, stalled, or stepped-back clock.
pub trait Clock: Send {
    fn now_ms(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

// ── Formatting ────────────────────────────────────────────────────────────────

/// Render epoch milliseconds as an RFC 3339 UTC timestamp.
///
/// Out-of-range values fall back to the raw millisecond count.
pub fn format_epoch_ms(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        None => format!("{}ms", epoch_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_system_clock_does_not_run_backwards_in_quick_succession() {
        let a = SystemClock.now_ms();
        let b = SystemClock.now_ms();
        assert!(b >= a - 1_000);
    }

    #[test]
    fn test_format_epoch_ms() {
        assert_eq!(format_epoch_ms(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_epoch_ms(1_500), "1970-01-01T00:00:01.500Z");
    }
}
