//! spreadsheet export of the monthly report, same columns as the csv
//! (sale_date, amount, growth_rate); a null growth leaves its cell empty

use std::path::Path;

use tracing::info;

use super::export::HEADER;
use crate::db::DATE_FMT;
use crate::error::ExportError;
use crate::stat::MonthlyBucket;

pub const SHEET : &str = "Sheet1";

/// write the buckets into a new workbook at `path`, replacing an existing one
pub fn write_xlsx<P: AsRef<Path>>(buckets: &[MonthlyBucket], path: P) -> Result<(), ExportError> {
    if buckets.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut book = umya_spreadsheet::new_file();
    let ws = book
        .get_sheet_by_name_mut(SHEET)
        .ok_or_else(|| ExportError::Xlsx(format!("missing sheet {}", SHEET)))?;

    // both 1-based, (col, row)
    for (col, name) in HEADER.iter().enumerate() {
        ws.get_cell_mut((col as u32 + 1, 1)).set_value(*name);
    }

    for (i, bucket) in buckets.iter().enumerate() {
        let row = i as u32 + 2;

        ws.get_cell_mut((1, row))
            .set_value(bucket.month_end.format(DATE_FMT).to_string());
        ws.get_cell_mut((2, row)).set_value_number(bucket.total_amount);
        if let Some(g) = bucket.growth_rate_pct {
            ws.get_cell_mut((3, row)).set_value_number(g);
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path.as_ref())
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;

    info!(path = ?path.as_ref(), rows = buckets.len(), "workbook exported");
    Ok(())
}
