use std::process::ExitCode;

use salesinsight::config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = "0.1.0"; // keep in synch w/ ver from Cargo.toml

fn main() -> ExitCode
{
    // config first, the log level comes from it
    let config = match Config::load()
    {
        Ok(c) => c,
        Err(e) =>
        {
            eprintln!("Could not load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Sales insight, version {}", VERSION);

    match salesinsight::run(&config)
    {
        Ok(report) =>
        {
            if !report.is_empty()
            {
                info!("report written to {:?}", config.export_path);
                info!("workbook written to {:?}", config.workbook_path);
                info!("chart written to {:?}", config.chart_path);
            }
            ExitCode::SUCCESS
        }
        Err(e) =>
        {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
