//! CRM Dashboard CLI
//!
//! Command-line access to the analytics backend and the dashboard flows:
//! - Check backend and database health
//! - Generate a report and save the rendered dashboard
//! - Export the report as PDF
//! - Show or toggle the saved theme

use anyhow::{bail, Context};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crm_dashboard::backend::{BackendClient, HealthPayload};
use crm_dashboard::config::{generate_default_config, Config};
use crm_dashboard::controller::{DashboardController, NavigationQueue, PdfOutcome, ReportOutcome};
use crm_dashboard::render::{render_page, PageOptions};
use crm_dashboard::theme::{FileThemeStore, ThemePreference};

#[derive(Parser)]
#[command(name = "crm-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CRM analytics dashboard tools")]
#[command(long_about = "Talk to the CRM analytics backend from the terminal.\nGenerate AI reports, export PDFs, and check backend health.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Analytics backend URL (overrides config)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Config file (default: ~/.config/crm-dashboard/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check backend health
    Health,

    /// Run the backend analysis and print the raw analytics
    Analyze,

    /// Test the backend database connection
    Database,

    /// Generate a report and save the rendered dashboard as HTML
    Report {
        /// Output file (default: crm_report_<timestamp>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a report and download it as PDF
    Pdf {
        /// Directory to save the PDF into
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show or toggle the saved theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum ThemeAction {
    /// Print the saved theme
    Show,
    /// Switch between light and dark
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }

    match cli.command {
        Commands::Health => {
            let client = BackendClient::new(config.backend.client_config())?;
            match client.health_check().await {
                Ok(health) => print_health(&health),
                Err(e) => {
                    eprintln!("Cannot reach analytics backend at {}", config.backend.base_url);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Analyze => {
            let client = BackendClient::new(config.backend.client_config())?;
            let analytics = client
                .get_analytics()
                .await
                .context("Analysis request failed")?;
            println!("{}", serde_json::to_string_pretty(&analytics)?);
        }

        Commands::Database => {
            let client = BackendClient::new(config.backend.client_config())?;
            let status = client
                .test_database()
                .await
                .context("Database test request failed")?;

            println!("Database: {}", if status.connected { "connected" } else { "not connected" });
            if !status.message.is_empty() {
                println!("  {}", status.message);
            }
            if !status.connected {
                std::process::exit(1);
            }
        }

        Commands::Report { output } => {
            let (controller, _, _) = build_controller(&config)?;

            match controller.generate_report().await? {
                ReportOutcome::Populated => {}
                ReportOutcome::ChartsOnly { message } => {
                    eprintln!("Report failed, saving charts only: {}", message);
                }
                ReportOutcome::Failed { message } => bail!("{}", message),
            }

            let view = controller.snapshot().await;
            let html = render_page(&view, &[], &PageOptions::snapshot()).into_string();

            let path = output.unwrap_or_else(|| default_report_path(Local::now().naive_local()));
            write_file(&path, html.as_bytes())?;
            println!("Dashboard written to {:?}", path);
        }

        Commands::Pdf { output_dir } => {
            let (controller, client, downloads) = build_controller(&config)?;

            if let ReportOutcome::Failed { message } | ReportOutcome::ChartsOnly { message } =
                controller.generate_report().await?
            {
                bail!("{}", message);
            }

            match controller.export_pdf().await? {
                PdfOutcome::Downloaded { filename, url } => {
                    // The download is fetched here rather than opened
                    downloads.drain();
                    let bytes = client
                        .fetch_pdf(&filename)
                        .await
                        .with_context(|| format!("Failed to download {}", url))?;

                    let path = output_dir.join(&filename);
                    write_file(&path, &bytes)?;

                    if let Some(toast) = controller.snapshot().await.toast {
                        println!("{}", toast.message);
                    }
                    println!("Saved {:?} ({} bytes)", path, bytes.len());
                }
                PdfOutcome::Failed { message } => bail!("{}", message),
            }
        }

        Commands::Theme { action } => {
            let store = Arc::new(FileThemeStore::new(&config.preferences.path));
            let mut preference = ThemePreference::load(store);

            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => println!("{}", preference.current()),
                ThemeAction::Toggle => {
                    let theme = preference.toggle()?;
                    println!("Theme set to {}", theme);
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    write_file(&path, content.as_bytes())?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

fn build_controller(
    config: &Config,
) -> anyhow::Result<(DashboardController, Arc<BackendClient>, Arc<NavigationQueue>)> {
    let client = Arc::new(BackendClient::new(config.backend.client_config())?);
    let downloads = Arc::new(NavigationQueue::new());
    let store = Arc::new(FileThemeStore::new(&config.preferences.path));

    let controller = DashboardController::new(client.clone(), downloads.clone(), store);
    Ok((controller, client, downloads))
}

fn print_health(health: &HealthPayload) {
    println!("CRM Dashboard v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Backend Status: {}", health.status);

    if let Some(source) = &health.data_source {
        println!("Data source: {}", source);
    }
    if let Some(timestamp) = &health.timestamp {
        println!("Checked at: {}", format_timestamp(timestamp));
    }

    if !health.is_healthy() {
        std::process::exit(1);
    }
}

/// Backend timestamps are naive ISO 8601, with or without fractional seconds
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn default_report_path(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("crm_report_{}.html", now.format("%Y%m%d_%H%M%S")))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-01T09:15:30.123456"),
            "2024-03-01 09:15:30"
        );
        assert_eq!(format_timestamp("2024-03-01T09:15:30"), "2024-03-01 09:15:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_default_report_path() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(
            default_report_path(now),
            PathBuf::from("crm_report_20240301_090507.html")
        );
    }

    #[test]
    fn test_cli_parses_global_backend_url() {
        let cli = Cli::parse_from(["crm-dashboard", "pdf", "--backend-url", "http://x/api", "-d", "out"]);
        assert_eq!(cli.backend_url.as_deref(), Some("http://x/api"));
        assert!(matches!(cli.command, Commands::Pdf { output_dir } if output_dir == Path::new("out")));
    }
}
