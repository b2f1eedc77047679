/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Materialize an epoch-seconds column into a [`Timestamp`].
///
/// `0` (and anything out of chrono's range) means the event never happened.
pub fn timestamp_from_unix(secs: i64) -> Option<Timestamp> {
    if secs == 0 {
        return None;
    }
    chrono::DateTime::from_timestamp(secs, 0)
}

/// Inverse of [`timestamp_from_unix`].
pub fn timestamp_to_unix(ts: Option<Timestamp>) -> i64 {
    ts.map(|t| t.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_never() {
        assert!(timestamp_from_unix(0).is_none());
        assert_eq!(timestamp_to_unix(None), 0);
    }

    #[test]
    fn epoch_seconds_survive() {
        let ts = timestamp_from_unix(1_546_300_800).unwrap();
        assert_eq!(ts.to_rfc3339(), "2019-01-01T00:00:00+00:00");
        assert_eq!(timestamp_to_unix(Some(ts)), 1_546_300_800);
    }
}
