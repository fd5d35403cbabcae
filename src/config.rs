//! where the db and the report files live, chart size and log level
//! defaults can be overridden by `config.toml` in the OS config folder

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::report::chart::ChartOptions;

pub const DB_NAME      : &str = "sales_insight.db";
pub const CONFIG_NAME  : &str = "config.toml";
pub const EXPORT_NAME  : &str = "sales_report.csv";
pub const WORKBOOK_NAME: &str = "sales_report.xlsx";
pub const CHART_NAME   : &str = "sales_chart.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub export_path: PathBuf,
    pub workbook_path: PathBuf,
    pub chart_path: PathBuf,
    pub chart: ChartOptions,
    pub log_level: String,
}

/// fields of config.toml, every one optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    db_path: Option<PathBuf>,
    export_path: Option<PathBuf>,
    workbook_path: Option<PathBuf>,
    chart_path: Option<PathBuf>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
    log_level: Option<String>,
}

impl Config {
    /// defaults with the db placed in `dir`, reports in the working directory
    pub fn defaults_in(dir: &Path) -> Self {
        Config {
            db_path: dir.join(DB_NAME),
            export_path: PathBuf::from(EXPORT_NAME),
            workbook_path: PathBuf::from(WORKBOOK_NAME),
            chart_path: PathBuf::from(CHART_NAME),
            chart: ChartOptions::default(),
            log_level: "info".to_string(),
        }
    }

    /// resolve the OS specific configuration folder (eg `~/.config` for unix),
    /// create it if missing and load the config from it
    pub fn load() -> Result<Self, ConfigError> {
        let projdir = ProjectDirs::from("dev", "salesinsight", "salesinsight")
            .ok_or(ConfigError::NoProjectDir)?;

        let dir = projdir.config_dir();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        Self::load_from(dir)
    }

    /// defaults for `dir`, overridden by `dir/config.toml` when present
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::defaults_in(dir);
        let path = dir.join(CONFIG_NAME);

        if path.exists() {
            let file: ConfigFile = toml::from_str(&fs::read_to_string(&path)?)?;
            config.apply(file);
        }

        Ok(config)
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(p) = file.db_path { self.db_path = p; }
        if let Some(p) = file.export_path { self.export_path = p; }
        if let Some(p) = file.workbook_path { self.workbook_path = p; }
        if let Some(p) = file.chart_path { self.chart_path = p; }
        if let Some(w) = file.chart_width { self.chart.width = w; }
        if let Some(h) = file.chart_height { self.chart.height = h; }
        if let Some(l) = file.log_level { self.log_level = l; }
    }
}
