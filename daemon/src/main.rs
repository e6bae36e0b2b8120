//! Atto wallet: entry point for a headless, synchronized account.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use atto_client::{HttpLedgerClient, StaticAuthenticator};
use atto_crypto::{
    decode_address, derive_address, generate_mnemonic, keypair_from_mnemonic, KeySigner,
};
use atto_types::{Amount, NetworkId, PublicKey};
use atto_utils::{init_logging, LogFormat, SystemClock};
use atto_wallet_core::{AccountManager, Collaborators, ShutdownController, WalletConfig};
use atto_work::WorkerClient;
use clap::Parser;

/// How long `send` waits for the first account snapshot.
const ACCOUNT_WAIT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "atto-wallet", about = "Atto account synchronization wallet")]
struct Cli {
    /// Ledger service base URL.
    #[arg(long, env = "ATTO_ENDPOINT")]
    endpoint: Option<String>,

    /// Work service base URL.
    #[arg(long, env = "ATTO_WORKER_ENDPOINT")]
    worker_endpoint: Option<String>,

    /// Network: "live", "beta", "dev" or "local".
    #[arg(long, env = "ATTO_NETWORK")]
    network: Option<String>,

    /// Representative for a newly opened account (address or hex key).
    #[arg(long, env = "ATTO_REPRESENTATIVE")]
    representative: Option<String>,

    /// Do not accept receivables automatically.
    #[arg(long, env = "ATTO_NO_AUTO_RECEIVE")]
    no_auto_receive: bool,

    /// Bearer token for the ledger and work services.
    #[arg(long, env = "ATTO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// BIP39 mnemonic of the wallet.
    #[arg(long, env = "ATTO_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    /// Account index derived from the mnemonic.
    #[arg(long, default_value_t = 0, env = "ATTO_ACCOUNT_INDEX")]
    index: u32,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATTO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATTO_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Keep the account synchronized until interrupted.
    Run,
    /// Send raw units to another account once the account state is known.
    Send {
        /// Receiver address or hex public key.
        #[arg(long)]
        to: String,
        /// Amount in raw units.
        #[arg(long)]
        amount: u64,
    },
    /// Print the address derived from the mnemonic.
    Address,
    /// Generate a fresh 24-word mnemonic.
    NewMnemonic,
}

fn parse_public_key(s: &str) -> anyhow::Result<PublicKey> {
    decode_address(s)
        .or_else(|| s.parse().ok())
        .ok_or_else(|| anyhow!("not an address or hex public key: {s}"))
}

/// Where the base configuration came from. Reported once logging is up.
#[derive(Debug, PartialEq)]
enum ConfigSource {
    Defaults,
    File(PathBuf),
    Fallback(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            Self::Defaults => tracing::debug!("No config file given, using defaults"),
            Self::File(path) => tracing::info!("Loaded config from {}", path.display()),
            Self::Fallback(error) => tracing::warn!("{error}, using defaults"),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<(WalletConfig, ConfigSource)> {
    let (base, source) = match cli.config {
        Some(ref path) => match WalletConfig::from_toml_file(path) {
            Ok(config) => (config, ConfigSource::File(path.clone())),
            Err(e) => (WalletConfig::default(), ConfigSource::Fallback(e.to_string())),
        },
        None => (WalletConfig::default(), ConfigSource::Defaults),
    };

    let network = match cli.network.as_deref() {
        Some(name) => name.parse::<NetworkId>()?,
        None => base.network,
    };
    let representative = match cli.representative.as_deref() {
        Some(key) => Some(parse_public_key(key)?),
        None => base.representative,
    };

    let config = WalletConfig {
        endpoint: cli.endpoint.clone().unwrap_or(base.endpoint),
        worker_endpoint: cli.worker_endpoint.clone().unwrap_or(base.worker_endpoint),
        network,
        representative,
        auto_receive: base.auto_receive && !cli.no_auto_receive,
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        log_format: cli.log_format.clone().unwrap_or(base.log_format),
        ..base
    };
    Ok((config, source))
}

fn build_manager(cli: &Cli, config: &WalletConfig) -> anyhow::Result<AccountManager> {
    let mnemonic = cli
        .mnemonic
        .as_deref()
        .context("ATTO_MNEMONIC (or --mnemonic) is required")?;
    let token = cli
        .token
        .clone()
        .context("ATTO_TOKEN (or --token) is required")?;

    let keys = keypair_from_mnemonic(mnemonic, cli.index)?;
    let authenticator = Arc::new(StaticAuthenticator::new(token));

    let ledger = HttpLedgerClient::new(config.endpoint.clone(), authenticator.clone())?
        .with_request_timeout(config.request_timeout());
    let worker = WorkerClient::new(config.worker_endpoint.clone(), authenticator)?
        .with_lead_time(config.work_lead_time());

    let collaborators = Collaborators {
        ledger: Arc::new(ledger),
        worker: Arc::new(worker),
        signer: Arc::new(KeySigner::new(keys)),
        clock: Arc::new(SystemClock),
    };
    Ok(AccountManager::new(config, collaborators, Vec::new()))
}

async fn run(manager: AccountManager) -> anyhow::Result<()> {
    manager.start()?;
    tracing::info!(
        address = %derive_address(&manager.public_key()),
        auto_receive = manager.auto_receive(),
        "Wallet running, press Ctrl-C to stop"
    );

    ShutdownController::wait_for_signal().await?;
    manager.shutdown().await;

    if let Ok(metrics) = manager.metrics().encode() {
        tracing::debug!(%metrics, "final metrics");
    }
    tracing::info!("Atto wallet exited cleanly");
    Ok(())
}

async fn send(manager: AccountManager, to: &str, amount: u64) -> anyhow::Result<()> {
    let receiver = parse_public_key(to)?;
    let mut account = manager.subscribe_account();
    manager.start()?;

    tokio::time::timeout(ACCOUNT_WAIT, account.wait_for(Option::is_some))
        .await
        .context("account state not received in time")??;

    let result = manager.send(receiver, Amount::new(amount)).await;
    manager.shutdown().await;

    match result {
        Ok(published) => {
            println!("{}", published.transaction.hash());
            println!("{}", published.ack);
            Ok(())
        }
        Err(e) => bail!("send failed ({}): {e}", e.category().as_str()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse().map_err(|e: String| anyhow!(e))?;
    init_logging(format, &config.log_level);
    source.log();

    match cli.command {
        Command::NewMnemonic => {
            println!("{}", generate_mnemonic()?);
            Ok(())
        }
        Command::Address => {
            let mnemonic = cli
                .mnemonic
                .as_deref()
                .context("ATTO_MNEMONIC (or --mnemonic) is required")?;
            let keys = keypair_from_mnemonic(mnemonic, cli.index)?;
            println!("{}", derive_address(&keys.public));
            println!("{}", keys.public);
            Ok(())
        }
        Command::Run => {
            tracing::info!(
                "Starting Atto wallet on {} network (ledger: {}, worker: {})",
                config.network.as_str(),
                config.endpoint,
                config.worker_endpoint,
            );
            run(build_manager(&cli, &config)?).await
        }
        Command::Send { ref to, amount } => {
            let manager = build_manager(&cli, &config)?;
            send(manager, to, amount).await
        }
    }
}
