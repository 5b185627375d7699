//! [`SqliteSource`] — the SQLite implementation of [`RecordSource`].

use std::path::Path;

use genrelens_core::{
  record::{CountryAllowList, Genre, ProductMeta, RawRecord, TaggedRecord},
  source::RecordSource,
  window::DateWindow,
};
use tracing::debug;

use crate::{
  encode::{encode_date, ProductRow, RecordRow},
  schema::SCHEMA,
  Result,
};

const RECORD_COLUMNS: &str = "
  p.genre_id, r.product_id, r.country_code, r.date,
  r.downloads, r.revenue, r.active_users, r.install_base,
  r.rating_value, r.rating_count, r.version_old, r.version_new";

fn read_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, RecordRow)> {
  Ok((row.get(0)?, RecordRow {
    product_id:   row.get(1)?,
    country_code: row.get(2)?,
    date:         row.get(3)?,
    downloads:    row.get(4)?,
    revenue:      row.get(5)?,
    active_users: row.get(6)?,
    install_base: row.get(7)?,
    rating_value: row.get(8)?,
    rating_count: row.get(9)?,
    version_old:  row.get(10)?,
    version_new:  row.get(11)?,
  }))
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Raw records, product metadata and genre definitions in a single SQLite
/// file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSource {
  conn: tokio_rusqlite::Connection,
}

impl SqliteSource {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let source = Self { conn };
    source.init_schema().await?;
    Ok(source)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let source = Self { conn };
    source.init_schema().await?;
    Ok(source)
  }

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

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Insert or replace genre definitions.
  pub async fn put_genres(&self, genres: &[Genre]) -> Result<()> {
    let rows: Vec<(i64, String)> = genres.iter().map(|g| (g.id, g.name.clone())).collect();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt =
            tx.prepare("INSERT OR REPLACE INTO genres (genre_id, name) VALUES (?1, ?2)")?;
          for (id, name) in &rows {
            stmt.execute(rusqlite::params![id, name])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace product metadata rows.
  pub async fn put_products(&self, products: &[ProductMeta]) -> Result<()> {
    let rows: Vec<ProductRow> = products.iter().map(ProductRow::encode).collect();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO products (
               product_id, genre_id, first_release_date, last_update_date, status
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for p in &rows {
            stmt.execute(rusqlite::params![
              p.product_id,
              p.genre_id,
              p.first_release_date,
              p.last_update_date,
              p.status,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace daily records, keyed by `(product, country, date)`.
  pub async fn put_records(&self, records: &[RawRecord]) -> Result<()> {
    let rows = records.iter().map(RecordRow::encode).collect::<Result<Vec<_>>>()?;
    let count = rows.len();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO daily_records (
               product_id, country_code, date, downloads, revenue,
               active_users, install_base, rating_value, rating_count,
               version_old, version_new
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          )?;
          for r in &rows {
            stmt.execute(rusqlite::params![
              r.product_id,
              r.country_code,
              r.date,
              r.downloads,
              r.revenue,
              r.active_users,
              r.install_base,
              r.rating_value,
              r.rating_count,
              r.version_old,
              r.version_new,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    debug!(count, "stored daily records");
    Ok(())
  }
}

// ─── RecordSource impl ───────────────────────────────────────────────────────

impl RecordSource for SqliteSource {
  type Error = crate::Error;

  async fn genres(&self) -> Result<Vec<Genre>> {
    let genres = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT genre_id, name FROM genres ORDER BY genre_id")?;
        let rows = stmt
          .query_map([], |row| Ok(Genre { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(genres)
  }

  async fn records(
    &self,
    window: DateWindow,
    countries: &CountryAllowList,
  ) -> Result<Vec<TaggedRecord>> {
    if countries.is_empty() {
      return Ok(Vec::new());
    }

    // ?1 and ?2 are the window bounds; one placeholder per country follows.
    let mut params = vec![encode_date(window.start), encode_date(window.end)];
    params.extend(countries.iter().map(str::to_owned));
    let placeholders = (3..=params.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT {RECORD_COLUMNS}
       FROM daily_records r
       INNER JOIN products p ON p.product_id = r.product_id
       WHERE r.date BETWEEN ?1 AND ?2
         AND r.country_code IN ({placeholders})
       ORDER BY r.product_id, r.country_code, r.date"
    );

    let rows: Vec<(i64, RecordRow)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), read_record_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(
      start = %window.start,
      end = %window.end,
      rows = rows.len(),
      "queried daily records"
    );
    rows
      .into_iter()
      .map(|(genre_id, row)| row.into_tagged(genre_id))
      .collect()
  }

  async fn products(&self) -> Result<Vec<ProductMeta>> {
    let rows: Vec<ProductRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT product_id, genre_id, first_release_date, last_update_date, status
           FROM products
           ORDER BY product_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ProductRow {
              product_id:         row.get(0)?,
              genre_id:           row.get(1)?,
              first_release_date: row.get(2)?,
              last_update_date:   row.get(3)?,
              status:             row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(ProductRow::into_product).collect()
  }
}
