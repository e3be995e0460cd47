//! CSV export of collector records.
//!
//! The column set and order are fixed. Values are written as stored: dates
//! in ISO 8601, `created_at` in RFC 3339, absent optionals as empty cells.

use std::io;

use chrono::NaiveDateTime;

use crate::{Result, collector::Collector};

/// Header row, in column order.
pub const HEADER: [&str; 15] = [
  "First Name",
  "Last Name",
  "Status",
  "Email",
  "Phone Number",
  "Birth Date",
  "Place of Birth",
  "Place of Residence",
  "Postal Code",
  "Personal Number",
  "Entry Date",
  "Expiration Date",
  "Reminder Count",
  "Note",
  "Created At",
];

fn row(c: &Collector) -> [String; 15] {
  let f = &c.fields;
  [
    f.first_name.clone(),
    f.last_name.clone(),
    f.status.label().to_owned(),
    f.email.clone(),
    f.phone_number.clone().unwrap_or_default(),
    f.birth_date.to_string(),
    f.place_of_birth.clone(),
    f.place_of_residence.clone(),
    f.postal_code.clone(),
    f.personal_number.clone().unwrap_or_default(),
    f.entry_date.to_string(),
    f.expiration_date.to_string(),
    f.reminder_count.to_string(),
    f.note.clone().unwrap_or_default(),
    c.created_at.to_rfc3339(),
  ]
}

/// Write the header and one row per collector to `writer`.
pub fn write_csv<'a, W, I>(writer: W, collectors: I) -> Result<()>
where
  W: io::Write,
  I: IntoIterator<Item = &'a Collector>,
{
  let mut out = csv::Writer::from_writer(writer);
  out.write_record(HEADER)?;
  for collector in collectors {
    out.write_record(row(collector))?;
  }
  out.flush()?;
  Ok(())
}

/// Render collectors as an in-memory CSV document.
pub fn to_csv_bytes<'a, I>(collectors: I) -> Result<Vec<u8>>
where
  I: IntoIterator<Item = &'a Collector>,
{
  let mut buf = Vec::new();
  write_csv(&mut buf, collectors)?;
  Ok(buf)
}

/// Download filename for an export taken at `at`.
pub fn export_filename(at: NaiveDateTime) -> String {
  format!("collector_data_{}.csv", at.format("%Y-%m-%d_%H-%M-%S"))
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{collector::NewCollector, dates::FixedClock};

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn sample() -> Collector {
    let mut input =
      NewCollector::new("Ana", "Horvat", date(1990, 5, 1), "ana@example.com");
    input.place_of_birth = "Split".into();
    input.address = "Ilica 1".into();
    input.place_of_residence = "Zagreb, Centar".into();
    input.postal_code = "10000".into();
    input.personal_number = Some("12345678901".into());
    input.reminder_count = Some(2);
    let created = Utc.with_ymd_and_hms(2024, 2, 15, 9, 30, 0).unwrap();
    Collector {
      collector_id:     Uuid::new_v4(),
      fields:           input.resolve(&FixedClock(date(2024, 2, 15))),
      created_at:       created,
      last_modified_at: created,
    }
  }

  #[test]
  fn header_only_for_empty_selection() {
    let bytes = to_csv_bytes(std::iter::empty()).unwrap();
    assert_eq!(
      String::from_utf8(bytes).unwrap(),
      "First Name,Last Name,Status,Email,Phone Number,Birth Date,\
       Place of Birth,Place of Residence,Postal Code,Personal Number,\
       Entry Date,Expiration Date,Reminder Count,Note,Created At\n"
    );
  }

  #[test]
  fn row_follows_header_order() {
    let collectors = [sample()];
    let text = String::from_utf8(to_csv_bytes(&collectors).unwrap()).unwrap();
    let mut lines = text.lines();
    lines.next();
    assert_eq!(
      lines.next().unwrap(),
      "Ana,Horvat,Active,ana@example.com,,1990-05-01,Split,\
       \"Zagreb, Centar\",10000,12345678901,2024-02-15,2025-02-28,2,,\
       2024-02-15T09:30:00+00:00"
    );
    assert_eq!(lines.next(), None);
  }

  #[test]
  fn filename_uses_timestamp() {
    let at = date(2024, 2, 15).and_hms_opt(9, 5, 7).unwrap();
    assert_eq!(export_filename(at), "collector_data_2024-02-15_09-05-07.csv");
  }
}
