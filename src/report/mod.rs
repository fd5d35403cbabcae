//! renders the monthly buckets: console table, csv and xlsx export, bar chart

pub mod chart;
pub mod export;
pub mod workbook;

use std::io::{self, Write};

use crate::db::helpers::round;
use crate::stat::MonthlyBucket;

/// print the report as a table
pub fn print_table<W: Write>(buckets : &[MonthlyBucket], out : &mut W)
    -> io::Result<()>
{
    writeln!(out, "--- Monthly Performance Report ---")?;

    if buckets.is_empty()
    {
        writeln!(out, "No sales data")?;
        return Ok(());
    }

    writeln!(out, "{:<12}{:>14}{:>12}", "Month", "Total", "Growth %")?;
    writeln!(out, "---------------------------------------------------------------")?;

    for bucket in buckets
    {
        let growth = match bucket.growth_rate_pct
        {
            Some(g) => format!("{:.2}", round(g)),
            None    => "-".to_string(),
        };

        writeln!(out, "{:<12}{:>14.2}{:>12}",
                 bucket.month_end.format("%Y-%m-%d").to_string(),
                 bucket.total_amount,
                 growth)?;
    }

    writeln!(out, "---------------------------------------------------------------")?;

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::stat::monthly_growth;
    use crate::db::MemoryStore;
    use crate::test;

    #[test]
    fn table_lists_every_bucket()
    {
        let agg = monthly_growth(&test::demo_memory_store()).unwrap();
        let mut out = Vec::new();
        print_table(&agg.buckets, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2025-11-30         3650.00           -"));
        assert!(text.contains("2025-12-31         1200.00      -67.12"));
    }

    #[test]
    fn empty_table_says_so()
    {
        let agg = monthly_growth(&MemoryStore::new()).unwrap();
        let mut out = Vec::new();
        print_table(&agg.buckets, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("No sales data"));
    }
}
