//! SQLite catalog store

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::application::errors::StoreError;
use crate::domain::entities::CatalogRecord;
use crate::domain::traits::CatalogStore;

const SELECT_COLUMNS: &str = "SELECT name, price, indexed, backlinks, traffic, description FROM domains";

/// Row as stored, before range checks
struct DomainRow {
    name: String,
    price: i64,
    indexed: bool,
    backlinks: Option<i64>,
    traffic: Option<i64>,
    description: Option<String>,
}

impl DomainRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            price: row.get(1)?,
            indexed: row.get(2)?,
            backlinks: row.get(3)?,
            traffic: row.get(4)?,
            description: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<CatalogRecord, StoreError> {
        let non_negative = |field: &str, value: i64| {
            u64::try_from(value).map_err(|_| {
                StoreError::InvalidRecord(format!("{}: negative {} {}", self.name, field, value))
            })
        };

        Ok(CatalogRecord {
            price: non_negative("price", self.price)?,
            indexed: self.indexed,
            backlinks: non_negative("backlinks", self.backlinks.unwrap_or(0))?,
            traffic: non_negative("traffic", self.traffic.unwrap_or(0))?,
            description: self.description.clone(),
            name: self.name.clone(),
        })
    }
}

/// Catalog backed by the `domains` table
#[derive(Clone)]
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_tables(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS domains (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                price INTEGER NOT NULL,
                indexed BOOLEAN NOT NULL DEFAULT 0,
                backlinks INTEGER DEFAULT 0,
                traffic INTEGER DEFAULT 0,
                description TEXT
            )",
            [],
        )?;
        tracing::debug!("Table 'domains' ready");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))
    }

    /// Insert records, updating existing ones by name. Store order of
    /// existing names is kept.
    pub fn import(&self, records: &[CatalogRecord]) -> Result<usize, StoreError> {
        for record in records {
            record.validate().map_err(StoreError::InvalidRecord)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for record in records {
            let to_sql = |field: &str, value: u64| {
                i64::try_from(value).map_err(|_| {
                    StoreError::InvalidRecord(format!("{}: {} out of range", record.name, field))
                })
            };
            tx.execute(
                "INSERT INTO domains (name, price, indexed, backlinks, traffic, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(name) DO UPDATE SET
                    price = excluded.price,
                    indexed = excluded.indexed,
                    backlinks = excluded.backlinks,
                    traffic = excluded.traffic,
                    description = excluded.description",
                params![
                    record.name,
                    to_sql("price", record.price)?,
                    record.indexed,
                    to_sql("backlinks", record.backlinks)?,
                    to_sql("traffic", record.traffic)?,
                    record.description,
                ],
            )?;
        }
        tx.commit()?;

        tracing::info!("Imported {} records", records.len());
        Ok(records.len())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM domains", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Run a query on the blocking pool
    async fn query<F>(&self, f: F) -> Result<Vec<CatalogRecord>, StoreError>
    where
        F: FnOnce(&Connection) -> Result<Vec<DomainRow>, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let rows = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))??;

        rows.into_iter().map(DomainRow::into_record).collect()
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn list_all(&self) -> Result<Vec<CatalogRecord>, StoreError> {
        self.query(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
            let rows = stmt
                .query_map([], DomainRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Vec<CatalogRecord>, StoreError> {
        let keyword = keyword.to_string();
        self.query(move |conn| {
            // instr() is case-sensitive, unlike LIKE
            let mut stmt = conn.prepare(&format!(
                "{} WHERE instr(name, ?1) > 0 ORDER BY id",
                SELECT_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![keyword], DomainRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }
}
