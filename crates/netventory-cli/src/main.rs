//! netventory CLI
//!
//! Command-line interface for the netventory daemon

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr;
use netventory_api::{DeviceResponse, IngestReportResponse, ReportEntry};
use netventory_client::HttpClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "netventory-cli")]
#[command(about = "Network device inventory CLI", long_about = None)]
struct Cli {
    /// Daemon base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 900)]
    timeout: u64,

    /// Print raw JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the daemon is up
    Health,
    /// List all devices
    Devices,
    /// Show one device
    Show {
        /// Device hostname
        hostname: String,
    },
    /// Probe an address and add the device
    Add {
        /// Expected device hostname
        hostname: String,
        /// Management address
        ip: String,
    },
    /// Remove a device
    Delete {
        /// Device hostname
        hostname: String,
    },
    /// Ingest a list of devices
    Populate(PopulateArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PopulateArgs {
    /// Local device list, one address per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Device list file stored on the daemon host
    #[arg(long)]
    remote: Option<String>,
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn device_table(devices: &[DeviceResponse]) -> String {
    let mut out = format!(
        "{:<20} {:<16} {:<16} {:<12} {:<14} {}\n",
        "HOSTNAME", "IP", "TYPE", "CHASSIS", "SERIAL", "VERSION"
    );
    for d in devices {
        out.push_str(&format!(
            "{:<20} {:<16} {:<16} {:<12} {:<14} {}\n",
            d.hostname,
            d.ip,
            d.device_type,
            d.chassis,
            d.serialnum,
            d.version.as_deref().unwrap_or("-")
        ));
    }
    out
}

fn report_summary(report: &IngestReportResponse) -> String {
    fn section(out: &mut String, title: &str, entries: &[ReportEntry]) {
        out.push_str(&format!("{title} ({})\n", entries.len()));
        for e in entries {
            let detail = e.hostname.as_deref().or(e.reason.as_deref()).unwrap_or("");
            out.push_str(&format!("  {:<16} {detail}\n", e.address));
        }
    }

    let mut out = String::new();
    section(&mut out, "success", &report.success);
    section(&mut out, "Present in DB", &report.already_present);
    section(&mut out, "Connection failure", &report.connection_failure);
    out
}

async fn run(cli: Cli) -> Result<()> {
    let client = HttpClient::with_timeout(&cli.url, Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", health.status);
        }
        Commands::Devices => {
            let devices = client.list_devices().await?;
            if cli.json {
                print_json(&devices)?;
            } else {
                print!("{}", device_table(&devices));
            }
        }
        Commands::Show { hostname } => {
            let device = client.get_device(&hostname).await?;
            if cli.json {
                print_json(&device)?;
            } else {
                print!("{}", device_table(std::slice::from_ref(&device)));
            }
        }
        Commands::Add { hostname, ip } => {
            let status = client.add_device(&hostname, &ip).await?;
            println!("{}", status.status);
        }
        Commands::Delete { hostname } => {
            let status = client.delete_device(&hostname).await?;
            println!("{}", status.status);
        }
        Commands::Populate(args) => {
            let report = match (args.file, args.remote) {
                (Some(path), _) => {
                    let content = tokio::fs::read_to_string(&path)
                        .await
                        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
                    let addresses = netventory_core::parse_device_list(&content);
                    tracing::info!(count = addresses.len(), "submitting device list");
                    client.populate(addresses).await?
                }
                (None, Some(name)) => client.populate_from_file(&name).await?,
                (None, None) => eyre::bail!("either --file or --remote is required"),
            };
            if cli.json {
                print_json(&report)?;
            } else {
                print!("{}", report_summary(&report));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}
