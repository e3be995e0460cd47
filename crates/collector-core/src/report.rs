//! The "expiring soon" report window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  collector::Collector,
  dates::{Clock, days_from, earliest_supported_date, latest_supported_date},
};

/// Default look-ahead for the expiring-soon report, in days.
pub const DEFAULT_EXPIRING_WINDOW_DAYS: i64 = 14;

/// An inclusive range of expiration dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringWindow {
  pub from: NaiveDate,
  pub to:   NaiveDate,
}

impl ExpiringWindow {
  /// Expirations from `today` through `today + days`. The far end is clamped
  /// to the supported record range, which no stored date exceeds.
  pub fn starting(today: NaiveDate, days: i64) -> Self {
    let to = days_from(today, days)
      .clamp(earliest_supported_date(), latest_supported_date());
    Self { from: today, to }
  }

  /// The window starting at the clock's current date.
  pub fn from_clock(clock: &dyn Clock, days: i64) -> Self {
    Self::starting(clock.today(), days)
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.from <= date && date <= self.to
  }

  /// Whether `collector` belongs in the report. Status is not consulted.
  pub fn matches(&self, collector: &Collector) -> bool {
    self.contains(collector.fields.expiration_date)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{collector::NewCollector, dates::FixedClock};

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn expiring_on(clock: &FixedClock, expiration: NaiveDate) -> Collector {
    let mut input =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com");
    input.entry_date = Some(date(2020, 1, 1));
    input.expiration_date = Some(expiration);
    let now = Utc::now();
    Collector {
      collector_id:     Uuid::new_v4(),
      fields:           input.resolve(clock),
      created_at:       now,
      last_modified_at: now,
    }
  }

  #[test]
  fn window_is_inclusive_on_both_ends() {
    let clock = FixedClock(date(2024, 12, 20));
    let window = ExpiringWindow::from_clock(&clock, DEFAULT_EXPIRING_WINDOW_DAYS);
    assert_eq!(window.to, date(2025, 1, 3));

    let offsets = [0_i64, 14, 15, -1];
    let matched: Vec<i64> = offsets
      .into_iter()
      .filter(|&n| window.matches(&expiring_on(&clock, clock.days_from_now(n))))
      .collect();
    assert_eq!(matched, [0, 14]);
  }

  #[test]
  fn huge_window_is_clamped_to_supported_range() {
    let window = ExpiringWindow::starting(date(2024, 6, 15), 3_000_000);
    assert_eq!(window.to, latest_supported_date());
    assert!(window.contains(date(2024, 6, 15)));
    assert!(window.contains(date(9999, 12, 31)));

    let window = ExpiringWindow::starting(date(2024, 6, 15), i64::MAX);
    assert_eq!(window.to, latest_supported_date());
  }

  #[test]
  fn zero_day_window_covers_today_only() {
    let window = ExpiringWindow::starting(date(2024, 3, 1), 0);
    assert!(window.contains(date(2024, 3, 1)));
    assert!(!window.contains(date(2024, 3, 2)));
    assert!(!window.contains(date(2024, 2, 29)));
  }
}
