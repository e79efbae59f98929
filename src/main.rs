//! Chemviz CLI
//!
//! Command-line front end for the equipment analysis API:
//! - Sign in, register, sign out
//! - Upload CSV/Excel datasets
//! - Browse history, charts and quick stats
//! - Download PDF reports

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chemviz::api::client::HttpGateway;
use chemviz::api::ApiGateway;
use chemviz::config::{generate_default_config, Config, LoggingConfig};
use chemviz::dashboard::{
    ActiveView, ChartData, ChartKind, ChartsDisplay, Dashboard, LoadState, Tab, UploadStatus,
    AUTH_FAILED_MESSAGE, DOWNLOAD_FAILED_MESSAGE, NO_ACTIVITY_MESSAGE,
};
use chemviz::models::{DatasetId, DatasetSummary, QuickStats, TrendSeries, TypeShare};
use chemviz::session::FileSessionStore;

/// Width of a full-scale text bar
const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "chemviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chemical equipment parameter visualizer")]
#[command(long_about = "Chemviz uploads chemical equipment readings to the analysis API,\nshows the computed summaries and charts, and downloads PDF reports.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/chemviz/config.toml, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long, env = "CHEMVIZ_USERNAME")]
        username: String,
        #[arg(short, long, env = "CHEMVIZ_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long, env = "CHEMVIZ_USERNAME")]
        username: String,
        #[arg(short, long, env = "CHEMVIZ_PASSWORD", hide_env_values = true)]
        password: String,
        /// Optional contact email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Upload a CSV or Excel file for analysis
    Upload {
        /// Path to a .csv, .xls or .xlsx file
        path: PathBuf,
    },

    /// List uploaded datasets, most recent first
    History,

    /// Chart the dataset history
    Charts {
        /// Chart type (bar, doughnut, trends)
        #[arg(short, long, default_value = "bar")]
        kind: ChartKind,
    },

    /// Download the PDF report for a dataset
    Report {
        /// Row number as listed by `chemviz history`
        #[arg(required_unless_present = "id")]
        row: Option<usize>,
        /// Dataset id, bypassing the history lookup
        #[arg(long, conflicts_with = "row")]
        id: Option<u64>,
        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Quick stats across all uploads
    Stats,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);
    tracing::debug!("API base URL: {}", config.api.base_url);

    let api = HttpGateway::new(&config.api)?;
    let mut dashboard = Dashboard::open(FileSessionStore::new(&config.session.path));
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            let gate = dashboard.gate_mut();
            gate.set_username(username);
            gate.set_password(password);
            sign_in(&mut dashboard, &api).await?;
        }

        Commands::Register {
            username,
            password,
            email,
        } => {
            let gate = dashboard.gate_mut();
            gate.toggle_mode();
            gate.set_username(username);
            gate.set_password(password);
            if let Some(email) = email {
                gate.set_email(email);
            }
            sign_in(&mut dashboard, &api).await?;
        }

        Commands::Logout => {
            let was_signed_in = !dashboard.is_gated();
            dashboard.logout()?;
            if was_signed_in {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }

        Commands::Whoami => match dashboard.current_session() {
            Some(session) => println!("{}", session.username),
            None => println!("Not signed in."),
        },

        Commands::Upload { path } => {
            require_session(&dashboard)?;
            let filename = file_name(&path)?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            dashboard.upload(&api, &filename, bytes).await;
            let Some(ActiveView::Upload(view)) = dashboard.active() else {
                bail!("Upload view not active");
            };

            if let Some(message) = view.error() {
                bail!("{}", message);
            }

            match view.status() {
                UploadStatus::Complete(summary) if json => {
                    println!("{}", serde_json::to_string_pretty(summary)?)
                }
                UploadStatus::Complete(summary) => {
                    println!("Analysis complete: {}", filename);
                    println!();
                    print_summary(summary);
                    print_shares(&summary.type_shares());
                }
                UploadStatus::Idle | UploadStatus::Uploading { .. } | UploadStatus::Failed(_) => {
                    bail!("Upload did not complete")
                }
            }
        }

        Commands::History => {
            require_session(&dashboard)?;
            dashboard.select_tab(Tab::Table);
            dashboard.mount(&api).await;
            let Some(ActiveView::Table(view)) = dashboard.active() else {
                bail!("Table view not active");
            };

            match view.history() {
                LoadState::Failed(message) => bail!("{}", message),
                LoadState::Loading => bail!("History did not load"),
                LoadState::Loaded(history) if json => {
                    println!("{}", serde_json::to_string_pretty(history)?)
                }
                LoadState::Loaded(history) if history.is_empty() => {
                    println!("No data available.");
                    println!();
                    println!("Upload a dataset with:");
                    println!("  chemviz upload equipment.csv");
                }
                LoadState::Loaded(_) => {
                    if let Some(latest) = view.latest() {
                        println!("Latest Dataset Summary");
                        print_summary(latest);
                        println!();
                    }

                    println!(
                        "{:<4} {:<8} {:>10} {:>10} {:>12}  {}",
                        "#", "Report", "Equipment", "Flowrate", "Pressure/Temp", "Types"
                    );
                    println!("{}", "-".repeat(78));
                    for row in view.rows() {
                        println!(
                            "{:<4} {:<8} {:>10} {:>10} {:>12}  {}",
                            row.number,
                            row.dataset_id.to_string(),
                            row.summary.total_equipment,
                            row.summary.avg_flowrate,
                            format!("{}/{}", row.summary.avg_pressure, row.summary.avg_temperature),
                            row.badges.join(", ")
                        );
                    }
                    println!();
                    println!("{}", view.footer());
                }
            }
        }

        Commands::Charts { kind } => {
            require_session(&dashboard)?;
            dashboard.select_tab(Tab::Charts);
            dashboard.mount(&api).await;
            let Some(ActiveView::Charts(view)) = dashboard.active_mut() else {
                bail!("Charts view not active");
            };
            view.select_kind(kind);

            match view.display() {
                ChartsDisplay::Loading => bail!("History did not load"),
                ChartsDisplay::Failed(message) => bail!("{}", message),
                ChartsDisplay::Empty => {
                    println!("No data available.");
                    println!("Upload a dataset to see charts.");
                }
                ChartsDisplay::Ready {
                    kind,
                    chart,
                    latest,
                } => {
                    println!("{}", kind.title());
                    println!();
                    match &chart {
                        ChartData::Distribution(shares) if kind == ChartKind::Doughnut => {
                            print_segments(shares)
                        }
                        ChartData::Distribution(shares) => print_shares(shares),
                        ChartData::Trend(trend) => print_trend(trend),
                    }
                    println!();
                    println!("Latest dataset");
                    print_summary(latest);
                }
            }
        }

        Commands::Report { row, id, output } => {
            require_session(&dashboard)?;

            let report = match (row, id) {
                (_, Some(id)) => api
                    .fetch_report(dashboard.current_session(), DatasetId(id))
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message(DOWNLOAD_FAILED_MESSAGE)))?,
                (Some(row), None) => {
                    if row == 0 {
                        bail!("Rows are numbered from 1");
                    }
                    dashboard.select_tab(Tab::Table);
                    dashboard.mount(&api).await;
                    if let Some(ActiveView::Table(view)) = dashboard.active() {
                        if let Some(message) = view.history().error() {
                            bail!("{}", message);
                        }
                        if view.rows().len() < row {
                            bail!("No row {} (history has {} entries)", row, view.rows().len());
                        }
                    }

                    match dashboard.download_report(&api, row - 1).await {
                        Some(report) => report,
                        None => bail!(DOWNLOAD_FAILED_MESSAGE),
                    }
                }
                (None, None) => bail!("Give a row number or --id"),
            };

            let path = output.join(report.filename());
            std::fs::write(&path, &report.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved {} ({} bytes)", path.display(), report.bytes.len());
        }

        Commands::Stats => {
            require_session(&dashboard)?;
            let stats = dashboard.quick_stats(&api).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Commands::Config { output } => write_default_config(output.as_deref())?,
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chemviz={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn sign_in(
    dashboard: &mut Dashboard<FileSessionStore>,
    api: &HttpGateway,
) -> anyhow::Result<()> {
    if dashboard.submit_auth(api).await {
        if let Some(session) = dashboard.current_session() {
            println!("Signed in as {}", session.username);
        }
        return Ok(());
    }

    let message = dashboard
        .gate()
        .error()
        .unwrap_or(AUTH_FAILED_MESSAGE)
        .to_string();
    bail!(message)
}

fn require_session(dashboard: &Dashboard<FileSessionStore>) -> anyhow::Result<()> {
    if dashboard.is_gated() {
        bail!("Not signed in. Run `chemviz login` first.");
    }
    Ok(())
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("Not a file: {}", path.display()))
}

fn print_summary(summary: &DatasetSummary) {
    println!("  Total Equipment:  {}", summary.total_equipment);
    println!("  Avg Flowrate:     {}", summary.avg_flowrate);
    println!("  Avg Pressure:     {}", summary.avg_pressure);
    println!("  Avg Temperature:  {}", summary.avg_temperature);
}

fn text_bar(share: f64) -> String {
    let filled = (share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn print_shares(shares: &[TypeShare]) {
    if shares.is_empty() {
        return;
    }
    println!();
    println!("Equipment Type Distribution");
    for share in shares {
        println!("  {:<16} {} {}", share.name, text_bar(share.share), share.count);
    }
}

fn print_segments(shares: &[TypeShare]) {
    for share in shares {
        println!("  {:<16} {:>6.1}%  ({})", share.name, share.percent(), share.count);
    }
}

fn print_trend(trend: &TrendSeries) {
    println!(
        "  {:<12} {:>14} {:>14} {:>16}",
        "", "Avg Flowrate", "Avg Pressure", "Avg Temperature"
    );
    for (i, label) in trend.labels.iter().enumerate() {
        println!(
            "  {:<12} {:>14} {:>14} {:>16}",
            label, trend.flowrate[i], trend.pressure[i], trend.temperature[i]
        );
    }
}

fn print_stats(stats: &QuickStats) {
    println!("Quick Stats");
    println!("  Total Uploads:  {}", stats.total_uploads);
    println!("  Avg Equipment:  {}", stats.avg_equipment);
    println!();
    println!("Recent Activity");
    if stats.recent.is_empty() {
        println!("  {}", NO_ACTIVITY_MESSAGE);
        return;
    }
    for activity in &stats.recent {
        println!("  • {} - {}", activity.action, activity.details);
    }
}
