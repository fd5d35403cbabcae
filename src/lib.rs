use std::io;

use chrono::NaiveDate;
use tracing::{error, info};

pub mod config;
pub mod db;
pub mod error;
pub mod report;
pub mod stat;

use config::Config;
use db::{SalesStore, SqliteStore};
use error::Result;
use stat::Aggregation;

/// demo sales inserted by `seed_demo_data`; (product, amount, (y, m, d))
pub const DEMO_SALES : [(&str, f64, (i32, u32, u32)); 7] = [
    ("Laptop",       3500., (2025, 11, 10)),
    ("Mouse",         150., (2025, 11, 25)),
    ("Monitor",      1200., (2025, 12,  5)),
    ("Keyboard",      300., (2025, 12, 20)),
    ("Gaming Chair", 1500., (2026,  1, 15)),
    ("Webcam",        450., (2026,  1, 28)),
    ("Headset",       600., (2026,  2,  5)),
];

/// populate any store with the demo sales; a failing insert is logged
/// and skipped, returns how many were inserted
pub fn seed_demo_data<S: SalesStore + ?Sized>(store : &mut S) -> usize
{
    let mut inserted = 0;

    for (product, amount, (y, m, d)) in DEMO_SALES
    {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else
        {
            error!("invalid demo date {}-{}-{} for {}", y, m, d, product);
            continue;
        };

        match store.insert(product, amount, date)
        {
            Ok(_)  => inserted += 1,
            Err(e) => error!("error inserting {}: {}", product, e),
        }
    }

    info!("database populated with {} demo sales", inserted);
    inserted
}

/// open the configured db, make sure the table is there and as expected
pub fn open_store(config : &Config) -> Result<SqliteStore>
{
    let mut store = SqliteStore::open(&config.db_path)?;
    store.init()?;
    store.check()?;
    Ok(store)
}

/// aggregate the store and hand the buckets to every sink;
/// with no data the sinks are skipped
pub fn build_report<S: SalesStore + ?Sized>(store : &S, config : &Config)
    -> Result<Aggregation>
{
    let aggregation = stat::monthly_growth(store)?;

    report::print_table(&aggregation.buckets, &mut io::stdout())
        .map_err(error::ExportError::from)?;

    if aggregation.is_empty()
    {
        info!("no data, skipping export and chart");
        return Ok(aggregation);
    }

    report::export::write_csv(&aggregation.buckets, &config.export_path)?;
    report::workbook::write_xlsx(&aggregation.buckets, &config.workbook_path)?;
    report::chart::save(&aggregation.buckets, &config.chart, &config.chart_path)?;

    Ok(aggregation)
}

/// the full demo workflow: open, seed, report
pub fn run(config : &Config) -> Result<Aggregation>
{
    info!(db = ?config.db_path, "using database");

    let mut store = open_store(config)?;
    seed_demo_data(&mut store);

    build_report(&store, config)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::db::MemoryStore;
    use crate::test::date;

    fn config_in(dir : &std::path::Path) -> Config
    {
        let mut config = Config::defaults_in(dir);
        config.export_path = dir.join("report.csv");
        config.workbook_path = dir.join("report.xlsx");
        config.chart_path = dir.join("chart.png");
        config.chart.width = 400;
        config.chart.height = 240;
        config
    }

    #[test]
    fn seeding_inserts_every_demo_sale()
    {
        let mut store = MemoryStore::new();
        assert_eq!(seed_demo_data(&mut store), 7);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn demo_report_has_four_months()
    {
        let mut store = MemoryStore::new();
        seed_demo_data(&mut store);

        let buckets = stat::monthly_growth(&store).unwrap().buckets;
        let totals : Vec<f64> = buckets.iter().map(|b| b.total_amount).collect();

        assert_eq!(totals, vec![3650., 1500., 1950., 600.]);
        assert_eq!(buckets[3].month_end, date(2026, 2, 28));
        assert!((buckets[2].growth_rate_pct.unwrap() - 30.).abs() < 1e-9);
    }

    #[test]
    fn run_writes_report_files()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let agg = run(&config).unwrap();

        assert_eq!(agg.buckets.len(), 4);
        assert!(config.db_path.exists());
        assert!(config.export_path.exists());
        assert!(config.workbook_path.exists());
        assert!(config.chart_path.exists());

        // a second run seeds again on the same db, totals double
        let agg = run(&config).unwrap();
        assert_eq!(agg.buckets[0].total_amount, 7300.);
    }

    #[test]
    fn overflowing_month_is_reported_not_exported()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let mut store = MemoryStore::new();
        seed_demo_data(&mut store);
        store.push_raw("Yacht", 1e308, "2025-12-01");
        store.push_raw("Yacht", 1e308, "2025-12-02");

        let agg = build_report(&store, &config).unwrap();

        assert_eq!(agg.buckets.len(), 3);
        assert_eq!(agg.skipped.len(), 1);
        assert!(config.chart_path.exists());

        let csv = std::fs::read_to_string(&config.export_path).unwrap();
        assert!(!csv.contains("inf"));
        assert!(!csv.contains("2025-12-31"));
    }

    #[test]
    fn empty_store_skips_sinks()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let agg = build_report(&MemoryStore::new(), &config).unwrap();

        assert!(agg.is_empty());
        assert!(!config.export_path.exists());
        assert!(!config.workbook_path.exists());
        assert!(!config.chart_path.exists());
    }
}
