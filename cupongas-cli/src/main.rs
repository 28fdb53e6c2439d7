use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cupongas_core::source::{FileSource, WorkbookSource};
use cupongas_core::{CouponError, CouponService, ServiceConfig};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "cupongas")]
#[command(about = "Gas-cylinder coupon lookup by RUT", long_about = None)]
#[command(version)]
struct Cli {
    /// Beneficiary RUT (e.g. 12345678-5)
    #[arg(value_name = "RUT")]
    rut: String,

    /// Workbook file to search (overrides configured download URLs)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for integrations
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        ServiceConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("cupongas.toml");
        if default_config_path.exists() {
            ServiceConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ServiceConfig::default()
        }
    };

    // A local file wins over configured download URLs
    let source: Option<Box<dyn WorkbookSource>> = if let Some(file) = &cli.file {
        Some(Box::new(FileSource::new(file)))
    } else if !config.source.urls.is_empty() {
        Some(Box::new(cupongas_core::fetch::HttpSource::new(
            config.source.urls.clone(),
        )?))
    } else {
        None
    };

    let mut service = CouponService::with_config(config, source);

    match service.search(&cli.rut) {
        Ok(Some(record)) => {
            match cli.format {
                OutputFormat::Human => formatter::print_human(&record),
                OutputFormat::Json => formatter::print_json(&record)?,
            }
            Ok(())
        }
        Ok(None) => {
            formatter::print_not_found(&cli.rut);
            std::process::exit(1);
        }
        Err(CouponError::InvalidRut(rut)) => {
            anyhow::bail!("invalid RUT '{rut}': check the format (e.g. 12345678-5)")
        }
        Err(err) => Err(err).context("Could not load any workbook data"),
    }
}
