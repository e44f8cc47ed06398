//! ZETA daemon — command-line entry point for the ledger.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use config::DaemonConfig;
use zeta_gateway::{Gateway, Submission};
use zeta_ledger::{Block, Chain};
use zeta_store::FileStore;
use zeta_types::{Address, Amount};

#[derive(Parser)]
#[command(name = "zeta-daemon", about = "ZETA ledger daemon")]
struct Cli {
    /// Chain profile: "standard" or "dev" (lower difficulty).
    /// When a config file is provided, defaults to the file's value.
    #[arg(long, env = "ZETA_NETWORK")]
    network: Option<String>,

    /// Data directory for ledger storage.
    #[arg(long, env = "ZETA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ZETA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ZETA_LOG_FORMAT")]
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
    /// Create the data directory and the genesis block.
    Init,
    /// Print a summary of the chain.
    Info,
    /// Verify every block hash and link; exits non-zero on corruption.
    Validate,
    /// Seal the pending pool into a new block (mints the miner reward).
    Mine {
        /// Address credited with the mining reward.
        #[arg(long)]
        miner: String,
    },
    /// Show the confirmed balance of an address.
    Balance { address: String },
    /// Show the most recent confirmed transactions touching an address.
    History {
        address: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Submit a platform reward and immediately mine it into a block.
    Reward {
        recipient: String,
        /// Amount in whole ZETA.
        amount: u64,
        #[arg(long, default_value = "manual reward")]
        reason: String,
        /// Address credited with the mining reward.
        #[arg(long)]
        miner: String,
    },
    /// Generate a fresh Ed25519 key pair and its address.
    Keygen,
}

fn init_tracing(config: &DaemonConfig) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_gateway(config: &DaemonConfig) -> anyhow::Result<Gateway> {
    let store: FileStore<Block> = FileStore::open(&config.data_dir)?;
    let chain = Chain::open(Arc::new(store), config.params())?;
    Ok(Gateway::new(chain))
}

fn parse_address(raw: &str) -> anyhow::Result<Address> {
    Address::parse(raw).map_err(|e| anyhow::anyhow!("invalid address {raw:?}: {e}"))
}

fn report(submission: Submission) -> anyhow::Result<()> {
    match submission {
        Submission::Accepted { id } => {
            println!("accepted {id}");
            Ok(())
        }
        Submission::Rejected { reason } => anyhow::bail!("rejected: {reason}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => Some(DaemonConfig::from_toml_file(path)?),
        None => None,
    };
    let base = file_config.unwrap_or_default();
    let config = DaemonConfig {
        network: cli.network.unwrap_or(base.network),
        data_dir: cli.data_dir.unwrap_or(base.data_dir),
        log_level: cli.log_level.unwrap_or(base.log_level),
        log_format: cli.log_format.unwrap_or(base.log_format),
    };

    init_tracing(&config);
    tracing::debug!(
        network = %config.network,
        data_dir = %config.data_dir.display(),
        "daemon configured"
    );

    match cli.command {
        Command::Init => {
            let gateway = open_gateway(&config)?;
            let info = gateway.chain_info();
            println!(
                "chain ready at {} ({} blocks, difficulty {})",
                config.data_dir.display(),
                info.length,
                info.difficulty
            );
        }
        Command::Info => {
            let gateway = open_gateway(&config)?;
            println!("{}", serde_json::to_string_pretty(&gateway.chain_info())?);
        }
        Command::Validate => {
            let gateway = open_gateway(&config)?;
            let verdict = gateway.validate_chain();
            println!("{}", verdict.reason());
            if !verdict.is_valid() {
                anyhow::bail!("chain is invalid");
            }
        }
        Command::Mine { miner } => {
            let gateway = open_gateway(&config)?;
            let miner = parse_address(&miner)?;
            let block = gateway.mine(miner).await?;
            println!(
                "sealed block {} ({} transactions) {}",
                block.index,
                block.transactions.len(),
                block.hash
            );
        }
        Command::Balance { address } => {
            let gateway = open_gateway(&config)?;
            let address = parse_address(&address)?;
            println!("{}", gateway.balance(&address));
        }
        Command::History { address, limit } => {
            let gateway = open_gateway(&config)?;
            let address = parse_address(&address)?;
            for tx in gateway.history(&address, limit) {
                println!("{tx}");
            }
        }
        Command::Reward {
            recipient,
            amount,
            reason,
            miner,
        } => {
            let gateway = open_gateway(&config)?;
            let recipient = parse_address(&recipient)?;
            let miner = parse_address(&miner)?;
            report(gateway.create_reward(recipient, Amount::from_zeta(amount), reason))?;
            let block = gateway.mine(miner).await?;
            println!("sealed block {} {}", block.index, block.hash);
        }
        Command::Keygen => {
            let keys = zeta_crypto::generate_keypair();
            println!("address:     {}", keys.address());
            println!("private key: {}", hex::encode(keys.private.0));
        }
    }

    Ok(())
}
