//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`, so lexical comparison in SQL matches date order. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use collector_core::{
  collector::{Collector, CollectorFields},
  status::CollectorStatus,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ────────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── LIKE patterns ────────────────────────────────────────────────────────────

/// A `%text%` pattern with `\` escaping for use with `ESCAPE '\'`.
pub fn contains_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row type ─────────────────────────────────────────────────────────────────

/// One `collectors` row as SQLite sees it, in [`crate::schema::COLUMNS`]
/// order.
pub struct CollectorRow {
  pub collector_id:       String,
  pub first_name:         String,
  pub last_name:          String,
  pub entry_date:         String,
  pub expiration_date:    String,
  pub status:             String,
  pub birth_date:         String,
  pub place_of_birth:     String,
  pub address:            String,
  pub place_of_residence: String,
  pub postal_code:        String,
  pub personal_number:    Option<String>,
  pub email:              String,
  pub phone_number:       Option<String>,
  pub whatsapp_opt_in:    bool,
  pub print_card:         bool,
  pub reminder_count:     i64,
  pub note:               Option<String>,
  pub created_at:         String,
  pub last_modified_at:   String,
}

impl CollectorRow {
  pub fn encode(c: &Collector) -> Self {
    let f = &c.fields;
    Self {
      collector_id:       encode_uuid(c.collector_id),
      first_name:         f.first_name.clone(),
      last_name:          f.last_name.clone(),
      entry_date:         encode_date(f.entry_date),
      expiration_date:    encode_date(f.expiration_date),
      status:             f.status.label().to_owned(),
      birth_date:         encode_date(f.birth_date),
      place_of_birth:     f.place_of_birth.clone(),
      address:            f.address.clone(),
      place_of_residence: f.place_of_residence.clone(),
      postal_code:        f.postal_code.clone(),
      personal_number:    f.personal_number.clone(),
      email:              f.email.clone(),
      phone_number:       f.phone_number.clone(),
      whatsapp_opt_in:    f.whatsapp_opt_in,
      print_card:         f.print_card,
      reminder_count:     i64::from(f.reminder_count),
      note:               f.note.clone(),
      created_at:         encode_dt(c.created_at),
      last_modified_at:   encode_dt(c.last_modified_at),
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      collector_id:       row.get(0)?,
      first_name:         row.get(1)?,
      last_name:          row.get(2)?,
      entry_date:         row.get(3)?,
      expiration_date:    row.get(4)?,
      status:             row.get(5)?,
      birth_date:         row.get(6)?,
      place_of_birth:     row.get(7)?,
      address:            row.get(8)?,
      place_of_residence: row.get(9)?,
      postal_code:        row.get(10)?,
      personal_number:    row.get(11)?,
      email:              row.get(12)?,
      phone_number:       row.get(13)?,
      whatsapp_opt_in:    row.get(14)?,
      print_card:         row.get(15)?,
      reminder_count:     row.get(16)?,
      note:               row.get(17)?,
      created_at:         row.get(18)?,
      last_modified_at:   row.get(19)?,
    })
  }

  pub fn into_collector(self) -> Result<Collector> {
    let reminder_count = u32::try_from(self.reminder_count).map_err(|_| {
      Error::Decode(format!("reminder count {}", self.reminder_count))
    })?;

    Ok(Collector {
      collector_id:     decode_uuid(&self.collector_id)?,
      fields:           CollectorFields {
        first_name: self.first_name,
        last_name: self.last_name,
        entry_date: decode_date(&self.entry_date)?,
        expiration_date: decode_date(&self.expiration_date)?,
        status: CollectorStatus::parse(&self.status)?,
        birth_date: decode_date(&self.birth_date)?,
        place_of_birth: self.place_of_birth,
        address: self.address,
        place_of_residence: self.place_of_residence,
        postal_code: self.postal_code,
        personal_number: self.personal_number,
        email: self.email,
        phone_number: self.phone_number,
        whatsapp_opt_in: self.whatsapp_opt_in,
        print_card: self.print_card,
        reminder_count,
        note: self.note,
      },
      created_at:       decode_dt(&self.created_at)?,
      last_modified_at: decode_dt(&self.last_modified_at)?,
    })
  }
}
