//! Unit tests for configuration loading.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::Settings;
    use crate::constants::{
        DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_HORIZON_DAYS,
        DEFAULT_PERSISTENCE_TIMEOUT_MS, DEFAULT_REFRESH_INTERVAL_SECONDS,
    };

    #[test]
    fn test_defaults_cover_every_knob() {
        let settings = Settings::load().expect("load with defaults");

        assert_eq!(settings.booking.horizon_days, DEFAULT_HORIZON_DAYS);
        assert_eq!(
            settings.booking.refresh_interval_seconds,
            DEFAULT_REFRESH_INTERVAL_SECONDS
        );
        assert_eq!(settings.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECONDS);
        assert_eq!(settings.cache.capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(
            settings.persistence.timeout_ms,
            DEFAULT_PERSISTENCE_TIMEOUT_MS
        );
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_duration_accessors() {
        let settings = Settings::load().expect("load with defaults");

        assert_eq!(settings.cache.ttl(), Duration::from_secs(300));
        assert_eq!(settings.persistence.timeout(), Duration::from_millis(5000));
        assert_eq!(
            settings.booking.refresh_interval(),
            Duration::from_secs(30)
        );
    }
}
