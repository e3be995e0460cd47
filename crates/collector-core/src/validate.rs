//! Record validation.
//!
//! [`validate`] runs every check against a resolved [`CollectorFields`] and
//! reports all failures together. Uniqueness of `personal_number` and `email`
//! is not checked here: the store enforces it atomically at write time.

use std::{fmt, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::{collector::CollectorFields, dates::is_supported};

static PERSONAL_NUMBER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("static pattern"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("static pattern")
});

/// Column width limits carried over from the record schema.
pub const NAME_MAX_LEN: usize = 100;
pub const PLACE_MAX_LEN: usize = 100;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const PHONE_MAX_LEN: usize = 15;

// ─── Violations ──────────────────────────────────────────────────────────────

/// A single failed check, tagged with the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub field:   &'static str,
  pub message: String,
}

/// Every check that failed for one record, in check order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViolationSet(Vec<Violation>);

impl ViolationSet {
  pub fn iter(&self) -> impl Iterator<Item = &Violation> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Whether any violation is tagged with `field`.
  pub fn has(&self, field: &str) -> bool {
    self.0.iter().any(|v| v.field == field)
  }

  /// The violations tagged with `field`.
  pub fn for_field<'a>(
    &'a self,
    field: &'a str,
  ) -> impl Iterator<Item = &'a Violation> + 'a {
    self.0.iter().filter(move |v| v.field == field)
  }
}

impl fmt::Display for ViolationSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, v) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", v.field, v.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ViolationSet {}

impl<'a> IntoIterator for &'a ViolationSet {
  type IntoIter = std::slice::Iter<'a, Violation>;
  type Item = &'a Violation;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

// ─── Validator ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct Collected(Vec<Violation>);

impl Collected {
  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(Violation { field, message: message.into() });
  }

  fn required(&mut self, field: &'static str, value: &str) {
    if value.trim().is_empty() {
      self.push(field, "this field is required.");
    }
  }

  fn supported_date(&mut self, field: &'static str, value: NaiveDate) {
    if !is_supported(value) {
      self.push(field, "enter a date between 0001-01-01 and 9999-12-31.");
    }
  }

  fn max_len(&mut self, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
      self.push(
        field,
        format!("ensure this value has at most {max} characters."),
      );
    }
  }
}

/// Check `fields` against every record invariant.
///
/// `today` is the reference date for the birth-date check; callers pass
/// [`Clock::today`](crate::dates::Clock::today).
pub fn validate(
  fields: &CollectorFields,
  today: NaiveDate,
) -> Result<(), ViolationSet> {
  let mut out = Collected::default();

  out.required("first_name", &fields.first_name);
  out.max_len("first_name", &fields.first_name, NAME_MAX_LEN);
  out.required("last_name", &fields.last_name);
  out.max_len("last_name", &fields.last_name, NAME_MAX_LEN);

  out.supported_date("entry_date", fields.entry_date);
  out.supported_date("expiration_date", fields.expiration_date);
  if fields.expiration_date < fields.entry_date {
    out.push(
      "expiration_date",
      "expiration date must not precede entry date.",
    );
  }

  out.supported_date("birth_date", fields.birth_date);
  if fields.birth_date > today {
    out.push("birth_date", "birth date must not be in the future.");
  }

  out.required("place_of_birth", &fields.place_of_birth);
  out.max_len("place_of_birth", &fields.place_of_birth, PLACE_MAX_LEN);
  out.required("address", &fields.address);
  out.max_len("address", &fields.address, ADDRESS_MAX_LEN);
  out.required("place_of_residence", &fields.place_of_residence);
  out.max_len(
    "place_of_residence",
    &fields.place_of_residence,
    PLACE_MAX_LEN,
  );

  if fields.postal_code.is_empty() {
    out.push("postal_code", "this field is required.");
  } else if !fields.postal_code.chars().all(|c| c.is_ascii_digit()) {
    out.push("postal_code", "postal code must contain only digits.");
  }

  if let Some(number) = &fields.personal_number
    && !PERSONAL_NUMBER.is_match(number)
  {
    out.push("personal_number", "personal number must be exactly 11 digits.");
  }

  if !EMAIL.is_match(&fields.email) {
    out.push("email", "enter a valid email address.");
  }

  if let Some(phone) = &fields.phone_number {
    out.max_len("phone_number", phone, PHONE_MAX_LEN);
  }

  if out.0.is_empty() {
    Ok(())
  } else {
    Err(ViolationSet(out.0))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{collector::NewCollector, dates::FixedClock};

  const TODAY: (i32, u32, u32) = (2024, 6, 15);

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn today() -> NaiveDate { date(TODAY.0, TODAY.1, TODAY.2) }

  fn valid() -> CollectorFields {
    let mut input =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com");
    input.place_of_birth = "Split".into();
    input.address = "Ilica 1".into();
    input.place_of_residence = "Zagreb".into();
    input.postal_code = "10000".into();
    input.personal_number = Some("12345678901".into());
    input.resolve(&FixedClock(today()))
  }

  #[test]
  fn well_formed_record_passes() {
    assert_eq!(validate(&valid(), today()), Ok(()));
  }

  #[test]
  fn expiration_equal_to_entry_is_allowed() {
    let mut fields = valid();
    fields.expiration_date = fields.entry_date;
    assert!(validate(&fields, today()).is_ok());
  }

  #[test]
  fn expiration_before_entry_is_rejected() {
    let mut fields = valid();
    fields.expiration_date = fields.entry_date.pred_opt().unwrap();

    let err = validate(&fields, today()).unwrap_err();
    assert_eq!(err.len(), 1);
    let v = err.for_field("expiration_date").next().unwrap();
    assert_eq!(v.message, "expiration date must not precede entry date.");
  }

  #[test]
  fn birth_date_today_is_allowed() {
    let mut fields = valid();
    fields.birth_date = today();
    assert!(validate(&fields, today()).is_ok());
  }

  #[test]
  fn birth_date_tomorrow_is_rejected() {
    let mut fields = valid();
    fields.birth_date = today().succ_opt().unwrap();

    let err = validate(&fields, today()).unwrap_err();
    assert!(err.has("birth_date"));
    assert_eq!(err.len(), 1);
  }

  #[test]
  fn personal_number_must_be_eleven_digits() {
    for (number, ok) in [
      ("12345678901", true),
      ("1234567890", false),
      ("1234567890a", false),
      ("123456789012", false),
      ("１２３４５６７８９０１", false),
    ] {
      let mut fields = valid();
      fields.personal_number = Some(number.into());
      let result = validate(&fields, today());
      assert_eq!(result.is_ok(), ok, "{number:?}");
      if let Err(err) = result {
        assert!(err.has("personal_number"));
      }
    }
  }

  #[test]
  fn absent_personal_number_is_allowed() {
    let mut fields = valid();
    fields.personal_number = None;
    assert!(validate(&fields, today()).is_ok());
  }

  #[test]
  fn malformed_email_is_rejected() {
    for email in ["", "ana", "ana@", "ana@example", "a na@example.com"] {
      let mut fields = valid();
      fields.email = email.into();
      assert!(
        validate(&fields, today()).unwrap_err().has("email"),
        "{email:?}"
      );
    }
  }

  #[test]
  fn postal_code_must_be_digits() {
    let mut fields = valid();
    fields.postal_code = "10A00".into();
    assert!(validate(&fields, today()).unwrap_err().has("postal_code"));

    fields.postal_code = String::new();
    assert!(validate(&fields, today()).unwrap_err().has("postal_code"));
  }

  #[test]
  fn places_and_address_are_required() {
    let mut fields = valid();
    fields.place_of_birth = String::new();
    fields.address = "  ".into();
    fields.place_of_residence = String::new();

    let err = validate(&fields, today()).unwrap_err();
    let tagged: Vec<_> = err.iter().map(|v| v.field).collect();
    assert_eq!(tagged, ["place_of_birth", "address", "place_of_residence"]);
  }

  #[test]
  fn dates_past_year_9999_are_rejected() {
    let mut fields = valid();
    fields.expiration_date = date(10000, 1, 1);
    let err = validate(&fields, today()).unwrap_err();
    let tagged: Vec<_> = err.iter().map(|v| v.field).collect();
    assert_eq!(tagged, ["expiration_date"]);

    let mut fields = valid();
    fields.entry_date = NaiveDate::MAX;
    fields.expiration_date = NaiveDate::MAX;
    let err = validate(&fields, today()).unwrap_err();
    assert!(err.has("entry_date"));
    assert!(err.has("expiration_date"));

    let mut fields = valid();
    fields.birth_date = NaiveDate::MIN;
    assert!(validate(&fields, today()).unwrap_err().has("birth_date"));
  }

  #[test]
  fn length_limits_are_enforced() {
    let mut fields = valid();
    fields.first_name = "x".repeat(NAME_MAX_LEN + 1);
    fields.phone_number = Some("0".repeat(PHONE_MAX_LEN + 1));

    let err = validate(&fields, today()).unwrap_err();
    assert!(err.has("first_name"));
    assert!(err.has("phone_number"));
  }

  #[test]
  fn all_violations_are_reported_together() {
    let mut fields = valid();
    fields.first_name = String::new();
    fields.expiration_date = fields.entry_date.pred_opt().unwrap();
    fields.birth_date = today().succ_opt().unwrap();
    fields.personal_number = Some("123".into());

    let err = validate(&fields, today()).unwrap_err();
    let tagged: Vec<_> = err.iter().map(|v| v.field).collect();
    assert_eq!(
      tagged,
      ["first_name", "expiration_date", "birth_date", "personal_number"]
    );
  }

  #[test]
  fn violations_serialize_as_list() {
    let mut fields = valid();
    fields.birth_date = today().succ_opt().unwrap();
    let err = validate(&fields, today()).unwrap_err();

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(
      json,
      serde_json::json!([{
        "field": "birth_date",
        "message": "birth date must not be in the future."
      }])
    );
  }
}
