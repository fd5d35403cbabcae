//! handles the persistent store of sale records
//! (table creation, integrity checking, inserts and reads)
//! the in-memory fake used for substitution lives in submodule memory

pub mod helpers;
pub mod memory;
pub mod queries;

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::{AggregationError, StorageError};
use helpers::*;
use queries::*;

pub use memory::MemoryStore;

/// format sale dates are written in
pub const DATE_FMT : &str = "%Y-%m-%d";

/// representing a row from sales table
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: i64,
    pub product: String,
    pub amount: f64,
    /// raw text as stored; see `parse_date`
    pub sale_date: String,
}

impl SaleRecord {
    /// parse the stored date; a trailing time of day is accepted and dropped
    pub fn parse_date(&self) -> Result<NaiveDate, AggregationError> {
        let raw = self.sale_date.trim();

        NaiveDate::parse_from_str(raw, DATE_FMT)
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .map(|dt| dt.date())
            })
            .map_err(|_| AggregationError::InvalidDate {
                id: self.id,
                raw: self.sale_date.clone(),
            })
    }
}

/// store handle the aggregator and the demo seeding depend on
pub trait SalesStore {
    /// append one record, returns the id assigned by the store
    fn insert(
        &mut self,
        product: &str,
        amount: f64,
        sale_date: NaiveDate,
    ) -> Result<i64, StorageError>;

    /// every stored record, ordered by id ascending
    fn query_all(&self) -> Result<Vec<SaleRecord>, StorageError>;
}

/// shared by every store: product is required and must carry a label
pub(crate) fn validate_product(product: &str) -> Result<(), StorageError> {
    if product.trim().is_empty() {
        return Err(StorageError::EmptyProduct);
    }
    Ok(())
}

/// sqlite backed store; the connection is held for the handle's lifetime
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// open (or create) the db file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = ?path.as_ref(), "opened sales db");
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(SqliteStore { conn: Connection::open_in_memory()? })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// create the sales table if it doesn't exist yet; safe to call repeatedly
    pub fn init(&mut self) -> Result<(), StorageError> {
        if self.table_exists(SQL_TABLEN_SALES)? {
            debug!("table {} already present", SQL_TABLEN_SALES);
            return Ok(());
        }

        info!("initializing db w/ table {}", SQL_TABLEN_SALES);
        self.conn.execute(SQL_CREATE_SALES, ())?;
        Ok(())
    }

    /// check existing db for integrity, conforming to expected layout
    pub fn check(&self) -> Result<(), StorageError> {
        // compare creation schema versus the one from sqlite_master
        let schema: String = self.conn.query_row(
            "SELECT sql FROM sqlite_master WHERE type='table' AND name=?1",
            params![SQL_TABLEN_SALES],
            |row| row.get(0),
        )?;

        if clean(&schema) != clean(SQL_CREATE_SALES) {
            return Err(StorageError::SchemaMismatch {
                table: SQL_TABLEN_SALES.to_string(),
            });
        }

        debug!("table {} passed integrity check", SQL_TABLEN_SALES);
        Ok(())
    }

    fn table_exists(&self, name: &str) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl SalesStore for SqliteStore {
    fn insert(
        &mut self,
        product: &str,
        amount: f64,
        sale_date: NaiveDate,
    ) -> Result<i64, StorageError> {
        validate_product(product)?;

        // parameterized; never format values into the statement
        self.conn.execute(
            SQL_INSERT_SALE,
            params![product, amount, sale_date.format(DATE_FMT).to_string()],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, product, amount, %sale_date, "inserted sale");
        Ok(id)
    }

    fn query_all(&self) -> Result<Vec<SaleRecord>, StorageError> {
        let mut stmt = self.conn.prepare(SQL_SELECT_SALES)?;

        // create iterator
        let sales_data = stmt.query_map([], |row| {
            Ok(SaleRecord {
                id: row.get(0)?,
                product: row.get(1)?,
                // missing amounts are skipped when summing
                amount: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                sale_date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;

        // create data vector and use iterator to populate it
        let mut sales = Vec::new();
        for sale in sales_data {
            sales.push(sale?);
        }

        Ok(sales)
    }
}
