//! tabular export of the monthly report
//! columns: sale_date (bucket month end), amount (bucket total), growth_rate

use std::path::Path;

use csv::{Terminator, WriterBuilder};
use tracing::info;

use crate::db::helpers::round;
use crate::db::DATE_FMT;
use crate::error::ExportError;
use crate::stat::MonthlyBucket;

pub const HEADER : [&str; 3] = ["sale_date", "amount", "growth_rate"];

/// write the buckets as csv into any writer; null growth is an empty field
pub fn write_to<W: std::io::Write>(buckets: &[MonthlyBucket], out: W) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    wtr.write_record(HEADER)?;

    for bucket in buckets {
        wtr.write_record([
            bucket.month_end.format(DATE_FMT).to_string(),
            bucket.total_amount.to_string(),
            bucket.growth_rate_pct.map(|g| round(g).to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// write the report file at `path`, replacing an existing one
pub fn write_csv<P: AsRef<Path>>(buckets: &[MonthlyBucket], path: P) -> Result<(), ExportError> {
    if buckets.is_empty() {
        return Err(ExportError::NoData);
    }

    let file = std::fs::File::create(path.as_ref())?;
    write_to(buckets, file)?;

    info!(path = ?path.as_ref(), rows = buckets.len(), "report exported");
    Ok(())
}
