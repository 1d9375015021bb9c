//! Exchange trading calendar and the calendar-aware window adjuster.
//!
//! The adjuster shifts a candidate window backward in whole-day steps until
//! it overlaps at least one valid trading day. The loop is bounded: a
//! calendar that never reports a trading day (malformed data, absurd
//! window) surfaces `CalendarError::NoTradingDays` instead of spinning
//! forever.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::CalendarError;

/// Authoritative source of which dates an exchange is open.
pub trait TradingCalendar: Send + Sync {
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// True if any date in `[start, end]` (inclusive) is a trading day.
    fn has_trading_day(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let mut date = start;
        while date <= end {
            if self.is_trading_day(date) {
                return true;
            }
            date += Duration::days(1);
        }
        false
    }
}

/// Shift `window` back one day at a time until `[start.date(), end.date()]`
/// contains a trading day. Idempotent on an already-valid window. Gives up
/// after `max_lookback_days` shifts.
pub fn adjust_for_market_days(
    calendar: &dyn TradingCalendar,
    window: TimeWindow,
    max_lookback_days: u32,
) -> Result<TimeWindow, CalendarError> {
    let original_end = window.end_date();
    let mut window = window;
    for _ in 0..=max_lookback_days {
        if calendar.has_trading_day(window.start_date(), window.end_date()) {
            return Ok(window);
        }
        window = window.shifted_back_days(1);
    }
    Err(CalendarError::NoTradingDays {
        window_end: original_end,
        lookback_days: max_lookback_days,
    })
}

/// NYSE full-closure calendar: weekends plus the exchange's observed
/// holidays, computed per year.
#[derive(Debug, Clone, Copy, Default)]
pub struct NyseCalendar;

impl NyseCalendar {
    pub fn new() -> Self {
        NyseCalendar
    }

    fn holidays(year: i32) -> Vec<NaiveDate> {
        let mut days = Vec::with_capacity(10);

        // New Year's Day. A Saturday Jan 1 is not observed on the prior
        // Friday (NYSE keeps the year-end session open).
        let new_years = ymd(year, 1, 1);
        match new_years.weekday() {
            Weekday::Sat => {}
            Weekday::Sun => days.push(ymd(year, 1, 2)),
            _ => days.push(new_years),
        }

        // Martin Luther King Jr. Day: third Monday of January.
        days.push(nth_weekday(year, 1, Weekday::Mon, 3));
        // Washington's Birthday: third Monday of February.
        days.push(nth_weekday(year, 2, Weekday::Mon, 3));
        // Good Friday: two days before Easter Sunday.
        days.push(easter_sunday(year) - Duration::days(2));
        // Memorial Day: last Monday of May.
        days.push(last_weekday(year, 5, Weekday::Mon));
        // Juneteenth, observed by the exchange since 2022.
        if year >= 2022 {
            days.push(observed(ymd(year, 6, 19)));
        }
        // Independence Day.
        days.push(observed(ymd(year, 7, 4)));
        // Labor Day: first Monday of September.
        days.push(nth_weekday(year, 9, Weekday::Mon, 1));
        // Thanksgiving: fourth Thursday of November.
        days.push(nth_weekday(year, 11, Weekday::Thu, 4));
        // Christmas Day.
        days.push(observed(ymd(year, 12, 25)));

        days
    }
}

impl TradingCalendar for NyseCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => false,
            _ => !Self::holidays(date.year()).contains(&date),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Saturday holidays shift to the preceding Friday, Sunday holidays to the
/// following Monday.
fn observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
        .expect("nth weekday exists in month")
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5)
        .unwrap_or_else(|| nth_weekday(year, month, weekday, 4))
}

/// Gregorian Easter (anonymous computus).
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}
