mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    reelbridge_config::Severity,
    tracing::{debug, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "reelbridge", about = "Reelbridge: relay TikTok links from WhatsApp as videos")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (defaults to ./reelbridge.toml, then ~/.config/reelbridge/).
    #[arg(long, global = true, env = "REELBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default when no subcommand is provided).
    Serve,
    /// Validate the configuration and report errors/warnings.
    CheckConfig {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match cli.command {
        // Default: serve when no subcommand is provided
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "reelbridge starting");

            let mut config = reelbridge_config::load_effective(cli.config.as_deref())?;

            // CLI args override config and environment values
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }

            // Never fatal: missing outbound settings are reported per webhook.
            for d in &reelbridge_config::validate(&config).diagnostics {
                if d.severity == Severity::Error {
                    warn!(path = %d.path, "config: {}", d.message);
                } else {
                    debug!(path = %d.path, severity = %d.severity, "config: {}", d.message);
                }
            }

            reelbridge_gateway::start_gateway(config).await
        },
        Some(Commands::CheckConfig { verbose }) => {
            config_commands::check(cli.config.as_deref(), verbose)
        },
    }
}
