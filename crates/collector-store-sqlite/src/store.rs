//! [`SqliteStore`] — the SQLite implementation of [`CollectorStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use collector_core::{
  collector::{Collector, CollectorFields, NewCollector},
  dates::{Clock, SystemClock},
  report::ExpiringWindow,
  store::{CollectorQuery, CollectorStore},
  validate::validate,
};

use crate::{
  Error, Result,
  encode::{CollectorRow, contains_pattern, encode_date, encode_dt, encode_uuid},
  schema::{COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A collector store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and clock are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<dyn Clock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_clock(path, Arc::new(SystemClock)).await
  }

  /// Like [`open`](Self::open), resolving "today" through `clock`.
  pub async fn open_with_clock(
    path: impl AsRef<Path>,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, clock };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_clock(Arc::new(SystemClock)).await
  }

  pub async fn open_in_memory_with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, clock };
    store.init_schema().await?;
    Ok(store)
  }

  /// The clock used for defaults, validation, and report windows.
  pub fn clock(&self) -> &dyn Clock { self.clock.as_ref() }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Resolve defaults and run the record validator. Every write starts here.
  fn prepare(&self, input: NewCollector) -> Result<CollectorFields> {
    let fields = input.resolve(self.clock());
    validate(&fields, self.clock.today())?;
    Ok(fields)
  }

  async fn fetch(&self, id: Uuid) -> Result<Collector> {
    self.get(id).await?.ok_or(Error::NotFound(id))
  }
}

// ─── CollectorStore impl ─────────────────────────────────────────────────────

impl CollectorStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewCollector) -> Result<Collector> {
    let fields = self.prepare(input)?;
    let now = Utc::now();
    let collector = Collector {
      collector_id:     Uuid::new_v4(),
      fields,
      created_at:       now,
      last_modified_at: now,
    };

    let row = CollectorRow::encode(&collector);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO collectors ({COLUMNS}) VALUES (
               ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
               ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
             )"
          ),
          rusqlite::params![
            row.collector_id,
            row.first_name,
            row.last_name,
            row.entry_date,
            row.expiration_date,
            row.status,
            row.birth_date,
            row.place_of_birth,
            row.address,
            row.place_of_residence,
            row.postal_code,
            row.personal_number,
            row.email,
            row.phone_number,
            row.whatsapp_opt_in,
            row.print_card,
            row.reminder_count,
            row.note,
            row.created_at,
            row.last_modified_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collector_id = %collector.collector_id, "collector created");
    Ok(collector)
  }

  async fn update(&self, id: Uuid, input: NewCollector) -> Result<Collector> {
    let reminder_count = input.reminder_count.map(i64::from);
    let fields = self.prepare(input)?;
    let now = Utc::now();
    let candidate = Collector {
      collector_id:     id,
      fields,
      // Not written by the UPDATE; the stored value is kept.
      created_at:       now,
      last_modified_at: now,
    };
    let row = CollectorRow::encode(&candidate);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE collectors SET
             first_name = ?2, last_name = ?3, entry_date = ?4,
             expiration_date = ?5, status = ?6, birth_date = ?7,
             place_of_birth = ?8, address = ?9, place_of_residence = ?10,
             postal_code = ?11, personal_number = ?12, email = ?13,
             phone_number = ?14, whatsapp_opt_in = ?15, print_card = ?16,
             reminder_count = COALESCE(?17, reminder_count),
             note = ?18, last_modified_at = ?19
           WHERE collector_id = ?1",
          rusqlite::params![
            row.collector_id,
            row.first_name,
            row.last_name,
            row.entry_date,
            row.expiration_date,
            row.status,
            row.birth_date,
            row.place_of_birth,
            row.address,
            row.place_of_residence,
            row.postal_code,
            row.personal_number,
            row.email,
            row.phone_number,
            row.whatsapp_opt_in,
            row.print_card,
            reminder_count,
            row.note,
            row.last_modified_at,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }

    tracing::debug!(collector_id = %id, "collector updated");
    self.fetch(id).await
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM collectors WHERE collector_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed > 0 {
      tracing::debug!(collector_id = %id, "collector deleted");
    }
    Ok(changed > 0)
  }

  async fn record_reminder(&self, id: Uuid) -> Result<Collector> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE collectors
           SET reminder_count = reminder_count + 1, last_modified_at = ?2
           WHERE collector_id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }
    self.fetch(id).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: Uuid) -> Result<Option<Collector>> {
    let id_str = encode_uuid(id);

    let raw: Option<CollectorRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM collectors WHERE collector_id = ?1"),
              rusqlite::params![id_str],
              CollectorRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(CollectorRow::into_collector).transpose()
  }

  async fn list(&self, query: &CollectorQuery) -> Result<Vec<Collector>> {
    let text_pattern = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(contains_pattern);
    let status_str = query.status.map(|s| s.label().to_owned());
    let from_str   = query.expiration_from.map(encode_date);
    let to_str     = query.expiration_to.map(encode_date);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<CollectorRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM collectors
           WHERE (?1 IS NULL
                  OR first_name LIKE ?1 ESCAPE '\\'
                  OR last_name  LIKE ?1 ESCAPE '\\')
             AND (?2 IS NULL OR status = ?2)
             AND (?3 IS NULL OR expiration_date >= ?3)
             AND (?4 IS NULL OR expiration_date <= ?4)
           ORDER BY last_name COLLATE NOCASE, first_name COLLATE NOCASE
           LIMIT ?5 OFFSET ?6"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              text_pattern,
              status_str,
              from_str,
              to_str,
              limit_val,
              offset_val,
            ],
            CollectorRow::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(CollectorRow::into_collector).collect()
  }

  async fn expiring_soon(&self, window_days: i64) -> Result<Vec<Collector>> {
    let window = ExpiringWindow::from_clock(self.clock(), window_days);
    let query = CollectorQuery::from(window);

    let mut collectors = self.list(&query).await?;
    collectors.sort_by_key(|c| c.fields.expiration_date);
    Ok(collectors)
  }
}
