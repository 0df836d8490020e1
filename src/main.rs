use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotabar::api_client::HttpUsageApi;
use quotabar::config::MonitorConfig;
use quotabar::credentials::FileCredentialSource;
use quotabar::monitor::{Action, AuthAction, MonitorState};
use quotabar::pace::PaceReserve;
use quotabar::paths;
use quotabar::ports::{Clock, Dependencies, SystemClock};
use quotabar::process::{CommandSignIn, SystemProcess};
use quotabar::status_line;
use quotabar::store::{Store, StoreHandle};
use quotabar::structured_logger::StructuredLogger;
use quotabar::update::{ReleaseVersionSource, CURRENT_VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "quotabar")]
#[command(about = "Tracks Copilot premium-request quota and how it paces against the calendar")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.quotabar/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Keep monitoring and print a status line whenever it changes (default)
    Watch,
    /// Fetch usage once and print the status line
    Status,
    /// Compute the pace reserve for a usage percentage and reset date
    Pace {
        #[arg(long)]
        percent_used: f64,
        /// Reset date as YYYY-MM-DD
        #[arg(long)]
        reset_date: String,
    },
}

fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("quotabar=debug")
        } else {
            EnvFilter::new("quotabar=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<MonitorConfig> {
    let path = match path {
        Some(path) => path,
        None => paths::config_path()?,
    };
    MonitorConfig::load(&path)
}

fn build_dependencies(config: &MonitorConfig) -> Dependencies {
    Dependencies {
        credentials: Arc::new(FileCredentialSource::new(config.token_path.clone())),
        api: Arc::new(HttpUsageApi::new(config.usage_url.clone())),
        versions: Arc::new(ReleaseVersionSource::new(
            config.releases_url.clone(),
            config.update_command.clone(),
        )),
        process: Arc::new(SystemProcess::from_env()),
        sign_in: Arc::new(CommandSignIn::new(&config.sign_in)),
        clock: Arc::new(SystemClock),
        timings: config.timings(),
    }
}

fn event_logger(config: &MonitorConfig) -> Option<Arc<StructuredLogger>> {
    if !config.event_log {
        return None;
    }
    let session_id = format!(
        "{}-{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        std::process::id()
    );
    let logger = paths::logs_dir().and_then(|dir| StructuredLogger::new(&session_id, &dir));
    match logger {
        Ok(logger) => {
            tracing::debug!(path = %logger.path().display(), "Event log enabled");
            Some(Arc::new(logger))
        }
        Err(e) => {
            tracing::warn!("Event log disabled: {:#}", e);
            None
        }
    }
}

/// Maps a line typed on stdin to a UI action.
fn parse_command(line: &str) -> Option<Action> {
    match line.trim() {
        "r" | "refresh" => Some(Action::RefreshTapped),
        "retry" => Some(Action::RetryTapped),
        "s" | "sign-in" => Some(Action::Auth(AuthAction::SignInTapped)),
        "u" | "update" => Some(Action::UpdateBannerTapped),
        "q" | "quit" => Some(Action::QuitTapped),
        _ => None,
    }
}

async fn forward_stdin(handle: StoreHandle) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Some(action) => {
                if !handle.send(action) {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("commands: r(efresh), retry, s(ign-in), u(pdate), q(uit)"),
        }
    }
}

async fn run_watch(config: MonitorConfig) -> Result<()> {
    let (store, mut snapshots) = Store::new(MonitorState::new(), build_dependencies(&config));
    let mut store = match event_logger(&config) {
        Some(logger) => store.with_logger(logger),
        None => store,
    };

    let show_percentage = config.show_percentage;
    let printer = tokio::spawn(async move {
        let mut last = String::new();
        while snapshots.changed().await.is_ok() {
            let line = status_line::format_status(&snapshots.borrow_and_update(), show_percentage);
            if line != last {
                println!("{}", line);
                last = line;
            }
        }
    });
    let input = tokio::spawn(forward_stdin(store.handle()));

    let handle = store.handle();
    handle.send(Action::AppLaunched);
    handle.send(Action::Appeared);

    tokio::select! {
        _ = store.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    input.abort();
    printer.abort();
    Ok(())
}

/// Returns false when the fetch failed.
async fn run_status(config: MonitorConfig) -> Result<bool> {
    let (mut store, snapshots) = Store::new(
        MonitorState::with_current_version(CURRENT_VERSION),
        build_dependencies(&config),
    );

    store.send(Action::RefreshTapped);
    loop {
        match store.next().await {
            Some(Action::UsageResponse { .. }) => break,
            Some(_) => continue,
            None => anyhow::bail!("monitor stopped before usage arrived"),
        }
    }

    let snapshot = snapshots.borrow().clone();
    println!(
        "{}",
        status_line::format_status(&snapshot, config.show_percentage)
    );
    Ok(snapshot.error.is_none())
}

fn run_pace(percent_used: f64, reset_date: &str) -> Result<()> {
    let now = SystemClock.now();
    let pace = PaceReserve::calculate(percent_used, reset_date, &now)
        .with_context(|| format!("Invalid reset date '{}', expected YYYY-MM-DD", reset_date))?;
    println!(
        "{:.1}% of the period elapsed, {}",
        pace.percent_time_elapsed,
        status_line::pace_label(&pace)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Pace {
            percent_used,
            reset_date,
        } => run_pace(percent_used, &reset_date),
        Command::Status => {
            let config = load_config(cli.config)?;
            if !run_status(config).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Watch => {
            let config = load_config(cli.config)?;
            run_watch(config).await
        }
    }
}
