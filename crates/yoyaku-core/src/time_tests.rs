//! Unit tests for canonical instant handling.

#[cfg(test)]
mod tests {
    use crate::time::{canonical_minute, is_canonical, minute_of_day};
    use chrono::{NaiveTime, TimeZone, Utc};

    #[test]
    fn test_canonical_minute_drops_seconds() {
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 42).unwrap();
        let canonical = canonical_minute(at);
        assert_eq!(canonical, Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap());
        assert!(is_canonical(canonical));
    }

    #[test]
    fn test_canonical_minute_is_idempotent() {
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();
        assert_eq!(canonical_minute(at), at);
    }

    #[test]
    fn test_canonical_minute_pre_epoch() {
        let at = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 30).unwrap();
        let canonical = canonical_minute(at);
        assert_eq!(
            canonical,
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap()
        );
    }

    #[test]
    fn test_minute_of_day() {
        assert_eq!(minute_of_day(NaiveTime::from_hms_opt(0, 0, 0).unwrap()), 0);
        assert_eq!(
            minute_of_day(NaiveTime::from_hms_opt(9, 30, 15).unwrap()),
            570
        );
        assert_eq!(
            minute_of_day(NaiveTime::from_hms_opt(23, 59, 0).unwrap()),
            1439
        );
    }
}
