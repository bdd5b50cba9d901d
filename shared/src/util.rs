/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence with a random start (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicI64, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQUENCE: OnceLock<AtomicI64> = OnceLock::new();

    let seq = SEQUENCE
        .get_or_init(|| AtomicI64::new(rand::thread_rng().gen_range(0..0x1000)))
        .fetch_add(1, Ordering::Relaxed)
        & 0xFFF; // 12 bits
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    (ts << 12) | seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_fits_js_safe_integer() {
        const MAX_SAFE: i64 = (1 << 53) - 1;
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id <= MAX_SAFE);
        }
    }

    #[test]
    fn test_snowflake_unique_in_burst() {
        let ids: std::collections::HashSet<i64> = (0..1000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
