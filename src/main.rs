use color_eyre::eyre::{Result, eyre};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt};

mod client;
mod ui;

// Keeps the non-blocking log writer alive for the whole run.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

const DEFAULT_STARTING_COINS: u64 = 100;
const DEFAULT_LOG_DIR: &str = "logs";

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: rollbox [--seed <n>] [--coins <n>] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --seed <n>       Seed the roll RNG for a reproducible session\n\
           --coins <n>      Starting coin balance (default {})\n\
           --log-dir <path> Directory for log files and the session recap (default {})",
        DEFAULT_STARTING_COINS, DEFAULT_LOG_DIR,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<client::AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut seed: Option<u64> = None;
    let mut starting_coins: Option<u64> = None;
    let mut log_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--seed requires a number argument"))?;
                if seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                seed = Some(
                    raw.parse()
                        .map_err(|_| eyre!("--seed expects an unsigned integer, got {raw:?}"))?,
                );
            }
            "--coins" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--coins requires a number argument"))?;
                if starting_coins.is_some() {
                    return Err(eyre!("--coins may only be specified once"));
                }
                starting_coins = Some(
                    raw.parse()
                        .map_err(|_| eyre!("--coins expects an unsigned integer, got {raw:?}"))?,
                );
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(PathBuf::from(dir));
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    Ok(client::AppConfig {
        seed,
        starting_coins: starting_coins.unwrap_or(DEFAULT_STARTING_COINS),
        log_dir: log_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
    })
}

fn init_logging(log_dir: &Path) {
    // The terminal is owned by the TUI, so logs go to a rolling file.
    let file = rolling::daily(log_dir, "rollbox.log");
    let (writer, guard) = tracing_appender::non_blocking(file);
    let _ = LOG_GUARD.set(guard);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = parse_cli_args()?;
    init_logging(&config.log_dir);
    tracing::info!(seed = ?config.seed, coins = config.starting_coins, "starting rollbox");
    client::run_app(config).await
}
