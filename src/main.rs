use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mleak::{
    collector::{ProcessCollector, SystemCollector},
    config::Config,
    monitor::Monitor,
    report::{format_memory, JsonRenderer, OutputFormat, Renderer, TableRenderer, TextRenderer},
};
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(not(any(target_os = "linux", windows)))]
compile_error!("mleak can only sample process memory on Linux and Windows");

/// Watch a process's resident memory and flag likely leaks
#[derive(Parser)]
#[command(name = "mleak", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Continuously monitor the memory usage of a process
    Monitor {
        pid: u32,

        /// Sampling interval (500ms, 10s, 2m, or bare seconds)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<Duration>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Samples kept in the trend window
        #[arg(short, long)]
        window: Option<usize>,

        /// Rows kept on screen in table mode
        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// List running processes with their resident memory
    List {
        /// Only show processes whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

fn parse_interval(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let value: f64 = digits
        .parse()
        .map_err(|_| format!("invalid interval {:?}", raw))?;
    let seconds = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => return Err(format!("unknown interval unit {:?}", other)),
    };
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err("interval must be positive".to_string());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("interval {:?} is too large", raw))
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn monitor(
    config: Config,
    pid: u32,
    interval: Option<Duration>,
    format: Option<OutputFormat>,
    window: Option<usize>,
    rows: Option<usize>,
) -> Result<()> {
    let interval = interval.unwrap_or_else(|| config.interval());
    let format = format.unwrap_or(config.general.format);
    let window = window.unwrap_or(config.detection.window_samples);
    let rows = rows.unwrap_or(config.display.table_rows);

    let collector = SystemCollector::new();
    collector
        .rss_bytes(pid)
        .with_context(|| format!("cannot monitor PID {}", pid))?;

    let mut monitor = Monitor::new(collector, pid, window).context("invalid window size")?;
    let mut renderer: Box<dyn Renderer> = match format {
        OutputFormat::Json => Box::new(JsonRenderer::new(io::stdout())),
        OutputFormat::Text => Box::new(TextRenderer::new(io::stdout())),
        OutputFormat::Table => {
            let table = TableRenderer::new(io::stdout(), pid, monitor.process_name(), interval, rows);
            if io::stdout().is_terminal() {
                Box::new(table)
            } else {
                Box::new(table.without_clear())
            }
        }
    };

    monitor
        .run(interval, &mut renderer)
        .await
        .with_context(|| format!("monitoring PID {} stopped", pid))
}

fn list(filter: Option<String>) {
    let collector = SystemCollector::new();
    println!("{:>8}  {:<20} {:>12}", "PID", "NAME", "RSS");
    for p in collector.list_processes() {
        if let Some(f) = &filter {
            if !p.name.contains(f.as_str()) {
                continue;
            }
        }
        println!("{:>8}  {:<20} {:>12}", p.pid, p.name, format_memory(p.rss_bytes));
    }
}

fn show_config(config: &Config, init: bool) -> Result<()> {
    let path = Config::config_path();
    if init && !path.exists() {
        config
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote default config to {}", path.display());
    }
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&Config::config_path());
    match cli.command {
        Commands::Monitor { pid, interval, format, window, rows } => {
            monitor(config, pid, interval, format, window, rows).await
        }
        Commands::List { filter } => {
            list(filter);
            Ok(())
        }
        Commands::Config { init } => show_config(&config, init),
    }
}
