//! Collector records — the single entity of the store.
//!
//! [`NewCollector`] is what callers submit. Resolving it against a [`Clock`]
//! fills the omitted defaults and yields [`CollectorFields`], the payload the
//! validator checks and the store persists. [`Collector`] is the stored form.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{dates::Clock, status::CollectorStatus};

// ─── Stored fields ───────────────────────────────────────────────────────────

/// Every caller-owned field of a collector, with all defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorFields {
  pub first_name:         String,
  pub last_name:          String,
  /// When the subscription started.
  pub entry_date:         NaiveDate,
  pub expiration_date:    NaiveDate,
  pub status:             CollectorStatus,
  pub birth_date:         NaiveDate,
  pub place_of_birth:     String,
  pub address:            String,
  pub place_of_residence: String,
  pub postal_code:        String,
  /// National identifier; eleven digits when present.
  pub personal_number:    Option<String>,
  pub email:              String,
  pub phone_number:       Option<String>,
  pub whatsapp_opt_in:    bool,
  pub print_card:         bool,
  /// How many renewal reminders have been sent.
  pub reminder_count:     u32,
  pub note:               Option<String>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

fn default_whatsapp_opt_in() -> bool { true }

/// Input to [`crate::store::CollectorStore::create`] and
/// [`crate::store::CollectorStore::update`].
///
/// Omitted dates take their computed defaults at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollector {
  pub first_name:         String,
  pub last_name:          String,
  #[serde(default)]
  pub entry_date:         Option<NaiveDate>,
  #[serde(default)]
  pub expiration_date:    Option<NaiveDate>,
  #[serde(default)]
  pub status:             CollectorStatus,
  pub birth_date:         NaiveDate,
  pub place_of_birth:     String,
  pub address:            String,
  pub place_of_residence: String,
  pub postal_code:        String,
  #[serde(default)]
  pub personal_number:    Option<String>,
  pub email:              String,
  #[serde(default)]
  pub phone_number:       Option<String>,
  #[serde(default = "default_whatsapp_opt_in")]
  pub whatsapp_opt_in:    bool,
  #[serde(default)]
  pub print_card:         bool,
  /// Zero on create when omitted; an update without it keeps the stored count.
  #[serde(default)]
  pub reminder_count:     Option<u32>,
  #[serde(default)]
  pub note:               Option<String>,
}

impl NewCollector {
  /// Convenience constructor with every optional field at its default.
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    birth_date: NaiveDate,
    email: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      entry_date: None,
      expiration_date: None,
      status: CollectorStatus::default(),
      birth_date,
      place_of_birth: String::new(),
      address: String::new(),
      place_of_residence: String::new(),
      postal_code: String::new(),
      personal_number: None,
      email: email.into(),
      phone_number: None,
      whatsapp_opt_in: default_whatsapp_opt_in(),
      print_card: false,
      reminder_count: None,
      note: None,
    }
  }

  /// Fill omitted dates from `clock` and normalise blank optional text to
  /// `None`. Required text is trimmed but left for the validator to judge.
  pub fn resolve(self, clock: &dyn Clock) -> CollectorFields {
    CollectorFields {
      first_name:         self.first_name.trim().to_owned(),
      last_name:          self.last_name.trim().to_owned(),
      entry_date:         self.entry_date.unwrap_or_else(|| clock.today()),
      expiration_date:    self
        .expiration_date
        .unwrap_or_else(|| clock.one_year_end_of_month()),
      status:             self.status,
      birth_date:         self.birth_date,
      place_of_birth:     self.place_of_birth.trim().to_owned(),
      address:            self.address.trim().to_owned(),
      place_of_residence: self.place_of_residence.trim().to_owned(),
      postal_code:        self.postal_code.trim().to_owned(),
      personal_number:    non_blank(self.personal_number),
      email:              self.email.trim().to_owned(),
      phone_number:       non_blank(self.phone_number),
      whatsapp_opt_in:    self.whatsapp_opt_in,
      print_card:         self.print_card,
      reminder_count:     self.reminder_count.unwrap_or(0),
      note:               non_blank(self.note),
    }
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted collector. Timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
  pub collector_id:     Uuid,
  #[serde(flatten)]
  pub fields:           CollectorFields,
  /// Set once on insert.
  pub created_at:       DateTime<Utc>,
  /// Bumped on every write.
  pub last_modified_at: DateTime<Utc>,
}

impl fmt::Display for Collector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} - {}",
      self.fields.first_name, self.fields.last_name, self.fields.status
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dates::FixedClock;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn resolve_fills_default_dates() {
    let clock = FixedClock(date(2024, 2, 15));
    let fields =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com")
        .resolve(&clock);

    assert_eq!(fields.entry_date, date(2024, 2, 15));
    assert_eq!(fields.expiration_date, date(2025, 2, 28));
    assert_eq!(fields.status, CollectorStatus::Active);
    assert_eq!(fields.reminder_count, 0);
    assert!(fields.whatsapp_opt_in);
    assert!(!fields.print_card);
  }

  #[test]
  fn resolve_keeps_supplied_dates() {
    let clock = FixedClock(date(2024, 2, 15));
    let mut input =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com");
    input.entry_date = Some(date(2023, 1, 1));
    input.expiration_date = Some(date(2023, 12, 31));

    let fields = input.resolve(&clock);
    assert_eq!(fields.entry_date, date(2023, 1, 1));
    assert_eq!(fields.expiration_date, date(2023, 12, 31));
  }

  #[test]
  fn resolve_treats_blank_optionals_as_absent() {
    let clock = FixedClock(date(2024, 2, 15));
    let mut input =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com");
    input.personal_number = Some("   ".into());
    input.phone_number = Some(String::new());
    input.note = Some(" keep ".into());

    let fields = input.resolve(&clock);
    assert_eq!(fields.personal_number, None);
    assert_eq!(fields.phone_number, None);
    assert_eq!(fields.note.as_deref(), Some("keep"));
  }

  #[test]
  fn json_input_uses_defaults() {
    let input: NewCollector = serde_json::from_value(serde_json::json!({
      "first_name": "Ana",
      "last_name": "Horvat",
      "birth_date": "1990-05-01",
      "place_of_birth": "Zagreb",
      "address": "Ilica 1",
      "place_of_residence": "Zagreb",
      "postal_code": "10000",
      "email": "ana@example.com"
    }))
    .unwrap();

    assert_eq!(input.entry_date, None);
    assert_eq!(input.reminder_count, None);
    assert_eq!(input.status, CollectorStatus::Active);
    assert!(input.whatsapp_opt_in);
  }

  #[test]
  fn displays_name_and_status() {
    let clock = FixedClock(date(2024, 2, 15));
    let fields =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com")
        .resolve(&clock);
    let now = Utc::now();
    let collector = Collector {
      collector_id: Uuid::new_v4(),
      fields,
      created_at: now,
      last_modified_at: now,
    };
    assert_eq!(collector.to_string(), "Ana Horvat - Active");
  }
}
