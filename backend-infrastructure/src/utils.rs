use chrono::{DateTime, TimeZone, Utc};

/// `None` when `ms` is outside chrono's representable range.
pub fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

pub fn utc_to_millis(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_survive_conversion() {
        let ms = 1_717_171_717_123;
        let at = millis_to_utc(ms).expect("in range");
        assert_eq!(utc_to_millis(&at), ms);
    }

    #[test]
    fn out_of_range_millis_are_rejected() {
        assert_eq!(millis_to_utc(i64::MAX), None);
        assert_eq!(millis_to_utc(i64::MIN), None);
    }
}
