//! Vec backed store, substitutes the sqlite store in tests

use chrono::NaiveDate;

use super::{validate_product, SaleRecord, SalesStore, DATE_FMT};
use crate::error::StorageError;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<SaleRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// push a row as another tool might have written it, date unchecked
    pub fn push_raw(&mut self, product: &str, amount: f64, sale_date: &str) -> i64 {
        let id = self.next_id();
        self.rows.push(SaleRecord {
            id,
            product: product.to_string(),
            amount,
            sale_date: sale_date.to_string(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn next_id(&self) -> i64 {
        self.rows.last().map_or(1, |r| r.id + 1)
    }
}

impl SalesStore for MemoryStore {
    fn insert(
        &mut self,
        product: &str,
        amount: f64,
        sale_date: NaiveDate,
    ) -> Result<i64, StorageError> {
        validate_product(product)?;
        Ok(self.push_raw(product, amount, &sale_date.format(DATE_FMT).to_string()))
    }

    fn query_all(&self) -> Result<Vec<SaleRecord>, StorageError> {
        Ok(self.rows.clone())
    }
}
