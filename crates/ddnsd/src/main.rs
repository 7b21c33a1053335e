// # ddnsd - DDNS Daemon
//
// This daemon is a THIN integration layer ONLY:
// - DO NOT add DNS logic, decision logic, or retry logic here
// - All DDNS logic MUST be in ddns-core
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from the command line (flags or environment)
// 2. Initializing logging and the runtime
// 3. Building the Cloudflare provider and the HTTP IP source
// 4. Starting the DDNS engine and forwarding shutdown signals to it
//
// ## Configuration
//
// Every flag can also be set through its environment variable:
//
// | Flag               | Environment         | Default                |
// |--------------------|---------------------|------------------------|
// | `-a, --api-token`  | `DDNS_API_TOKEN`    | (required)             |
// | `-z, --zone-id`    | `DDNS_ZONE_ID`      |                        |
// | `-t, --record-type`| `DDNS_RECORD_TYPE`  | `A`                    |
// | `-n, --name`       | `DDNS_RECORD_NAME`  | `@`                    |
// | `-T, --ttl`        | `DDNS_TTL`          | `60`                   |
// | `-u, --url`        | `DDNS_IP_URL`       | `http://api.ipify.org` |
// | `-N, --ip`         | `DDNS_IP`           |                        |
// | `-i, --interval`   | `DDNS_INTERVAL`     | `300`                  |
// | `--once`           | `DDNS_ONCE`         | off                    |
// | `-p, --parse`      | `DDNS_PARSE`        | `full`                 |
// | `-j, --json-path`  | `DDNS_JSON_PATH`    |                        |
// | `--timeout`        | `DDNS_HTTP_TIMEOUT` | `30` (0 = none)        |
// | `--dry-run`        | `DDNS_DRY_RUN`      | off                    |
// | `--log-level`      | `DDNS_LOG_LEVEL`    | `info`                 |
//
// ## Example
//
// ```bash
// export DDNS_API_TOKEN=your_token
// export DDNS_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
//
// ddnsd --name home.example.com --interval 600
// ddnsd --name home.example.com --url https://ipinfo.io/json --parse json --json-path ip --once
// ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use ddns_core::config::{
    DdnsConfig, DEFAULT_IP_URL, IpSourceConfig, ParseMode, ProviderConfig, RecordConfig, Schedule,
};
use ddns_core::DdnsEngine;
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown, or a successful single run
/// - 1: Configuration or startup error (including runtime setup)
/// - 2: Runtime error (including a failed single run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a Cloudflare DNS record pointed at this host's public IP
#[derive(Parser)]
#[command(name = "ddnsd", version, about, long_about = None)]
struct Args {
    /// Cloudflare API token with Zone:DNS:Edit permissions
    #[arg(short = 'a', long, env = "DDNS_API_TOKEN", default_value = "", hide_env_values = true)]
    api_token: String,

    /// Zone that holds the record
    #[arg(short = 'z', long, env = "DDNS_ZONE_ID", default_value = "")]
    zone_id: String,

    /// Record type to match and write
    #[arg(short = 't', long, env = "DDNS_RECORD_TYPE", default_value = "A")]
    record_type: String,

    /// Record name, exactly as Cloudflare reports it
    #[arg(short = 'n', long, env = "DDNS_RECORD_NAME", default_value = "@")]
    name: String,

    /// TTL in seconds sent with every update
    #[arg(short = 'T', long, env = "DDNS_TTL", default_value_t = 60)]
    ttl: u32,

    /// URL that answers with this host's public IP
    #[arg(short = 'u', long, env = "DDNS_IP_URL", default_value = DEFAULT_IP_URL)]
    url: String,

    /// Use this address instead of asking the IP service
    #[arg(short = 'N', long = "ip", env = "DDNS_IP", default_value = "")]
    manual_ip: String,

    /// Seconds between update cycles
    #[arg(short = 'i', long, env = "DDNS_INTERVAL", default_value_t = 300)]
    interval: u64,

    /// Run a single update cycle and exit
    #[arg(long, env = "DDNS_ONCE")]
    once: bool,

    /// How to read the IP service response: full or json
    #[arg(short = 'p', long = "parse", env = "DDNS_PARSE", default_value = "full")]
    parse_mode: ParseMode,

    /// Dotted key path to the address in a JSON response (e.g. data.ip)
    #[arg(short = 'j', long, env = "DDNS_JSON_PATH", default_value = "")]
    json_path: String,

    /// HTTP timeout in seconds for every request (0 disables it)
    #[arg(long = "timeout", env = "DDNS_HTTP_TIMEOUT", default_value_t = 30)]
    timeout_secs: u64,

    /// Decide and log, but never write to Cloudflare
    #[arg(long, env = "DDNS_DRY_RUN")]
    dry_run: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

impl Args {
    /// Build the DDNS configuration from the parsed arguments
    fn into_config(self) -> DdnsConfig {
        let mut provider = ProviderConfig::new(self.api_token, self.zone_id);
        provider.timeout_secs = self.timeout_secs;

        let schedule = if self.once {
            Schedule::Once
        } else {
            Schedule::Every {
                interval_secs: self.interval,
            }
        };

        DdnsConfig {
            provider,
            ip_source: IpSourceConfig {
                url: self.url,
                parse_mode: self.parse_mode,
                json_path: non_empty(self.json_path),
                manual_ip: non_empty(self.manual_ip),
                timeout_secs: self.timeout_secs,
            },
            record: RecordConfig::new(self.name)
                .with_record_type(self.record_type)
                .with_ttl(self.ttl),
            schedule,
            dry_run: self.dry_run,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // A token is the one thing there is no sensible default for
    if args.api_token.is_empty() {
        if let Err(e) = Args::command().print_help() {
            eprintln!("Failed to print help: {}", e);
        }
        eprintln!("\nConfiguration error: an API token is required (--api-token or DDNS_API_TOKEN)");
        return DdnsExitCode::ConfigError.into();
    }

    let log_level = args.log_level;
    let config = args.into_config();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");
    info!(
        "Managing {} record '{}' in zone {}",
        config.record.record_type, config.record.name, config.provider.zone_id
    );
    if config.dry_run {
        warn!("Dry-run mode: no record will be written");
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(run_daemon(config)).into()
}

/// Build the components and run the engine until it stops
async fn run_daemon(config: DdnsConfig) -> DdnsExitCode {
    let engine = match build_engine(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Startup error: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    // Forward SIGTERM/SIGINT to the engine; it stops between cycles
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let signal_task = tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => info!("Received shutdown signal: {}", signal),
            Err(e) => {
                error!("Shutdown signal handling failed: {}", e);
                // Keep the sender alive so the engine is not stopped by accident
                std::future::pending::<()>().await;
            }
        }
        let _ = shutdown_tx.send(());
    });

    let result = engine.run_with_shutdown(Some(shutdown_rx)).await;
    signal_task.abort();

    match result {
        Ok(()) => {
            info!("Shutting down daemon");
            DdnsExitCode::CleanShutdown
        }
        Err(e) => {
            error!("Update failed: {}", e);
            DdnsExitCode::RuntimeError
        }
    }
}

/// Wire the HTTP IP source and the Cloudflare provider into an engine
fn build_engine(config: DdnsConfig) -> Result<DdnsEngine> {
    let ip_source = HttpIpSource::from_config(&config.ip_source)?;
    let provider = CloudflareProvider::from_config(&config.provider)?;

    Ok(DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        config,
    )?)
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    // Set up signal handlers for SIGTERM and SIGINT
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["ddnsd"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DdnsExitCode::CleanShutdown as u8, 0);
        assert_eq!(DdnsExitCode::ConfigError as u8, 1);
        assert_eq!(DdnsExitCode::RuntimeError as u8, 2);
    }

    #[test]
    fn test_flags_map_onto_config() {
        let config = parse(&[
            "-a", "token", "-z", "zone", "-t", "AAAA", "-n", "home.example.com", "-T", "120",
            "-u", "https://ipinfo.io/json", "-p", "json", "-j", "data.ip", "--timeout", "0",
            "--dry-run", "--once",
        ])
        .into_config();

        assert_eq!(config.provider.api_token, "token");
        assert_eq!(config.provider.zone_id, "zone");
        assert_eq!(config.provider.timeout(), None);
        assert_eq!(config.record.record_type, "AAAA");
        assert_eq!(config.record.name, "home.example.com");
        assert_eq!(config.record.ttl, 120);
        assert_eq!(config.ip_source.url, "https://ipinfo.io/json");
        assert_eq!(config.ip_source.parse_mode, ParseMode::Json);
        assert_eq!(config.ip_source.json_path.as_deref(), Some("data.ip"));
        assert_eq!(config.schedule, Schedule::Once);
        assert!(config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_manual_ip_and_interval() {
        let config = parse(&["-a", "token", "-N", "9.9.9.9", "-i", "60"]).into_config();

        assert_eq!(config.ip_source.manual_ip.as_deref(), Some("9.9.9.9"));
        assert_eq!(config.schedule, Schedule::Every { interval_secs: 60 });
    }

    #[test]
    fn test_unknown_parse_mode_is_rejected() {
        let result = Args::try_parse_from(["ddnsd", "-a", "token", "--parse", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_mode_without_path_fails_validation() {
        let config = parse(&["-a", "token", "--parse", "json"]).into_config();
        assert!(config.validate().is_err());
    }
}
