// Entity timestamps
// Storage keeps epoch milliseconds, so entities never carry finer precision

use chrono::{DateTime, SubsecRound, Utc};

pub fn at_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn drops_sub_millisecond_digits() {
        let at = Utc
            .timestamp_opt(1_717_171_717, 123_456_789)
            .single()
            .expect("valid instant");
        let truncated = at_millis(at);
        assert_eq!(truncated.nanosecond(), 123_000_000);
        assert_eq!(truncated.timestamp_millis(), at.timestamp_millis());
        assert_eq!(at_millis(truncated), truncated);
    }
}
