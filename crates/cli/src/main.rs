use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    ws_session::MemoryStore,
    ws_session_cli::ScriptRunner,
    ws_session_config::WsSessionConfig,
};

#[derive(Parser)]
#[command(name = "ws-session", about = "Request-scoped session facade driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error). Defaults to the config value.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Only look for ws-session.{toml,yaml,yml,json} in this directory.
    #[arg(long, global = true, env = "WS_SESSION_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON-lines script of session operations (stdin if FILE is omitted).
    Run { file: Option<PathBuf> },
    /// Print the effective configuration as TOML.
    Config,
}

fn init_telemetry(cli: &Cli, config: &WsSessionConfig) {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr; stdout carries script results.
    if cli.json_logs || config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(dir) = &cli.config_dir {
        ws_session_config::set_config_dir(dir.clone());
    }
    let config = ws_session_config::discover_and_load();
    init_telemetry(&cli, &config);

    info!(version = env!("CARGO_PKG_VERSION"), "ws-session starting");

    match &cli.command {
        Commands::Run { file } => {
            let mut runner = ScriptRunner::new(MemoryStore::from_config(&config.store));
            let stdout = io::stdout().lock();
            let count = match file {
                Some(path) => {
                    let f = File::open(path)
                        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?;
                    runner.run(BufReader::new(f), stdout)?
                },
                None => runner.run(io::stdin().lock(), stdout)?,
            };
            info!(operations = count, "script finished");
            Ok(())
        },
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| anyhow::anyhow!("serialize config: {e}"))?;
            print!("{rendered}");
            Ok(())
        },
    }
}
