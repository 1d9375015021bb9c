use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Timezone-aware `(start, end)` window with `start <= end` enforced at
/// construction. The calendar adjuster shifts windows back in whole-day
/// steps, which preserves the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if start > end {
            return Err("Window start must not be after end".to_string());
        }
        Ok(TimeWindow { start, end })
    }

    /// Window covering the `minutes` leading up to `end`.
    pub fn trailing_minutes(end: DateTime<Utc>, minutes: i64) -> Self {
        TimeWindow {
            start: end - Duration::minutes(minutes),
            end,
        }
    }

    /// Window covering the `days` leading up to `end`.
    pub fn trailing_days(end: DateTime<Utc>, days: i64) -> Self {
        TimeWindow {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn shifted_back_days(&self, days: i64) -> Self {
        TimeWindow {
            start: self.start - Duration::days(days),
            end: self.end - Duration::days(days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_rejects_inverted_window() {
        let start = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(TimeWindow::new(start, end).is_err());
    }

    #[test]
    fn test_new_allows_zero_span() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(TimeWindow::new(at, at).is_ok());
    }

    #[test]
    fn test_trailing_minutes_span() {
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::trailing_minutes(end, 100);
        assert_eq!(window.end() - window.start(), Duration::minutes(100));
    }

    #[test]
    fn test_shift_preserves_span_and_order() {
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let window = TimeWindow::trailing_minutes(end, 100);
        let shifted = window.shifted_back_days(3);

        assert_eq!(shifted.end() - shifted.start(), Duration::minutes(100));
        assert!(shifted.start() <= shifted.end());
        assert_eq!(shifted.end(), end - Duration::days(3));
    }
}
