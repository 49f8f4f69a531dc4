use chrono::{DateTime, Utc};

/// Timestamp written into report headers.
pub fn report_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn report_stamp_is_utc_iso() {
        let when = Utc.with_ymd_and_hms(2024, 10, 31, 23, 59, 1).unwrap();
        assert_eq!(report_stamp(when), "2024-10-31T23:59:01Z");
    }
}
