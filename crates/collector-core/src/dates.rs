//! Date derivation — default values and reporting-window bounds.
//!
//! Everything that depends on "today" goes through a [`Clock`], so stores and
//! tests can pin the calendar date instead of reading the system clock.

use chrono::{Datelike, Days, Duration, Local, Months, NaiveDate};

/// Number of days added to a reference date before snapping to month end.
pub const ONE_YEAR_DAYS: u64 = 365;

// ─── Clock ───────────────────────────────────────────────────────────────────

/// A source of the current calendar date.
pub trait Clock: Send + Sync {
  /// The current calendar date in the reference timezone.
  fn today(&self) -> NaiveDate;

  /// `today() + n` days. `n` may be negative.
  fn days_from_now(&self, n: i64) -> NaiveDate { days_from(self.today(), n) }

  /// The default expiration date for a record created today.
  fn one_year_end_of_month(&self) -> NaiveDate {
    one_year_end_of_month(self.today())
  }
}

/// Reads the date from the system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.0 }
}

// ─── Pure helpers ────────────────────────────────────────────────────────────

/// `reference + 365 days`, moved to the last day of the resulting month.
pub fn one_year_end_of_month(reference: NaiveDate) -> NaiveDate {
  let target = reference
    .checked_add_days(Days::new(ONE_YEAR_DAYS))
    .unwrap_or(NaiveDate::MAX);
  last_day_of_month(target)
}

/// The last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
  date
    .with_day(1)
    .and_then(|first| first.checked_add_months(Months::new(1)))
    .and_then(|next_first| next_first.pred_opt())
    // Only the final representable month has no successor.
    .unwrap_or(NaiveDate::MAX)
}

/// The earliest date a record may carry.
pub fn earliest_supported_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The latest date a record may carry. Beyond year 9999 the ISO form gains a
/// sign and no longer sorts as text.
pub fn latest_supported_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Whether `date` lies within the supported record range.
pub fn is_supported(date: NaiveDate) -> bool {
  (earliest_supported_date()..=latest_supported_date()).contains(&date)
}

/// `reference + n` days, saturating at the representable calendar bounds.
pub fn days_from(reference: NaiveDate, n: i64) -> NaiveDate {
  let saturated = if n < 0 { NaiveDate::MIN } else { NaiveDate::MAX };
  Duration::try_days(n)
    .and_then(|offset| reference.checked_add_signed(offset))
    .unwrap_or(saturated)
}
