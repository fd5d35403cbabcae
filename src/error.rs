//! error types of the crate; library functions return these,
//! the binary decides whether to log and continue or abort

use chrono::NaiveDate;
use thiserror::Error as ThisError;

/// failures of the persistent store
#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("product label must not be empty")]
    EmptyProduct,

    #[error("table {table} failed integrity check")]
    SchemaMismatch { table: String },
}

/// a stored record that can't be aggregated
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum AggregationError {
    #[error("sale #{id} has unparseable date '{raw}'")]
    InvalidDate { id: i64, raw: String },

    #[error("total of month ending {month_end} is not a finite number")]
    NonFiniteTotal { month_end: NaiveDate },
}

/// failures while writing the report files
#[derive(Debug, ThisError)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("failed to write workbook: {0}")]
    Xlsx(String),

    #[error("embedded chart font is invalid")]
    Font,

    #[error("no monthly data to export")]
    NoData,

    #[error("monthly totals exceed the chartable range")]
    NonFiniteTotal,
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("could not resolve OS specific configuration folder")]
    NoProjectDir,
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
