//! Wallet starters CLI.

mod output;
mod watch;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use starter_store::StarterStore;
use starter_store_fs::FileStarterStore;
use starter_types::{Network, StarterKind};
use starter_utils::{init_logging, LogFormat};
use starter_wallet_core::{InstallDirectory, ReconciliationRunner, StarterConfig, StarterService};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "starters", about = "Manage wallet starters for layer-1 and sidechain wallets")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "STARTERS_CONFIG")]
    config: Option<PathBuf>,

    /// Application data directory (starters live in `wallet_starters/`).
    #[arg(long, env = "STARTERS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory holding chain binaries.
    #[arg(long, env = "STARTERS_INSTALL_DIR")]
    install_dir: Option<PathBuf>,

    /// Network: "bitcoin", "testnet", "signet" or "regtest".
    #[arg(long, env = "STARTERS_NETWORK")]
    network: Option<Network>,

    /// Log format: "human" or "json".
    #[arg(long, env = "STARTERS_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "STARTERS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the master starter.
    Master {
        #[command(subcommand)]
        action: MasterAction,
    },
    /// Manage the layer-1 starter.
    L1 {
        #[command(subcommand)]
        action: L1Action,
    },
    /// Manage sidechain starters.
    Sidechain {
        #[command(subcommand)]
        action: SidechainAction,
    },
    /// List persisted starters.
    List {
        /// Print mnemonics, keys and descriptors.
        #[arg(long)]
        reveal: bool,
    },
    /// Derive starters for every installed chain once.
    Reconcile,
    /// Reconcile whenever the set of installed chains changes.
    Watch,
}

#[derive(Subcommand)]
enum MasterAction {
    /// Generate a new 12-word master.
    Generate {
        #[arg(long, env = "STARTERS_PASSPHRASE", default_value = "", hide_env_values = true)]
        passphrase: String,
        /// Replace an existing master.
        #[arg(long)]
        force: bool,
    },
    /// Import an existing mnemonic as the master.
    Import {
        #[arg(long, env = "STARTERS_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        #[arg(long, env = "STARTERS_PASSPHRASE", default_value = "", hide_env_values = true)]
        passphrase: String,
        #[arg(long)]
        force: bool,
    },
    /// Show the master starter.
    Show {
        #[arg(long)]
        reveal: bool,
    },
    /// Delete the master starter.
    Delete,
    /// Write an encrypted backup of the master mnemonic.
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, env = "STARTERS_BACKUP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Restore the master from an encrypted backup.
    Restore {
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long, env = "STARTERS_BACKUP_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "STARTERS_PASSPHRASE", default_value = "", hide_env_values = true)]
        passphrase: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum L1Action {
    /// Derive the layer-1 starter from the master.
    Derive {
        #[arg(long, default_value = "Bitcoin Core (Patched)")]
        name: String,
    },
    /// Delete the layer-1 starter.
    Delete,
}

#[derive(Subcommand)]
enum SidechainAction {
    /// Derive the starter for a sidechain slot.
    Derive {
        slot: u8,
        /// Display name; defaults to the configured chain for the slot.
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete the starter for a sidechain slot.
    Delete { slot: u8 },
}

fn load_config(cli: &Cli) -> anyhow::Result<StarterConfig> {
    let mut config = match &cli.config {
        Some(path) => StarterConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StarterConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(install_dir) = &cli.install_dir {
        config.install_dir = Some(install_dir.clone());
    }
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    init_logging(format, &config.log_level);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        network = %config.network,
        "configuration loaded"
    );

    let service = StarterService::new(FileStarterStore::new(&config.data_dir), config.network);

    match cli.command {
        Command::Master { action } => match action {
            MasterAction::Generate { passphrase, force } => {
                let record = service.create_master(&passphrase, force)?;
                println!("{}", record.mnemonic);
                eprintln!("Write these words down; they are the only backup of every starter.");
            }
            MasterAction::Import {
                mnemonic,
                passphrase,
                force,
            } => {
                let record = service.import_master(&mnemonic, &passphrase, force)?;
                print!(
                    "{}",
                    output::render_record(StarterKind::Master, &record, config.network, false)
                );
            }
            MasterAction::Show { reveal } => {
                let record = service.load_master_verified()?;
                print!(
                    "{}",
                    output::render_record(StarterKind::Master, &record, config.network, reveal)
                );
            }
            MasterAction::Delete => report_delete("master", service.delete_master()?),
            MasterAction::Export { out, password } => {
                service.export_master(&out, &password)?;
                println!("master backup written to {}", out.display());
            }
            MasterAction::Restore {
                input,
                password,
                passphrase,
                force,
            } => {
                let record = service.restore_master(&input, &password, &passphrase, force)?;
                print!(
                    "{}",
                    output::render_record(StarterKind::Master, &record, config.network, false)
                );
            }
        },
        Command::L1 { action } => match action {
            L1Action::Derive { name } => {
                let record = service.derive_l1_starter(&name)?;
                print!(
                    "{}",
                    output::render_record(StarterKind::L1, &record, config.network, false)
                );
            }
            L1Action::Delete => report_delete("l1", service.delete_l1()?),
        },
        Command::Sidechain { action } => match action {
            SidechainAction::Derive { slot, name } => {
                let name = match name {
                    Some(name) => name,
                    None => configured_name(&config, slot)?,
                };
                let record = service.derive_sidechain_starter(slot, &name)?;
                print!(
                    "{}",
                    output::render_record(StarterKind::Sidechain(slot), &record, config.network, false)
                );
            }
            SidechainAction::Delete { slot } => {
                report_delete(&format!("sidechain {slot}"), service.delete_sidechain(slot)?)
            }
        },
        Command::List { reveal } => {
            let records = service.store().list()?;
            if records.is_empty() {
                println!("no starters in {}", service.store().dir().display());
            }
            for (kind, record) in &records {
                print!("{}", output::render_record(*kind, record, config.network, reveal));
            }
        }
        Command::Reconcile => {
            let installs = InstallDirectory::new(config.install_dir());
            let report =
                ReconciliationRunner::new(&service).reconcile_installed(&config.chains, &installs);
            for (chain, outcome) in &report.outcomes {
                println!("{chain}: {outcome:?}");
            }
        }
        Command::Watch => watch::run(&service, &config).await?,
    }

    Ok(())
}

fn configured_name(config: &StarterConfig, slot: u8) -> anyhow::Result<String> {
    match config
        .chains
        .iter()
        .find(|chain| chain.sidechain_slot == Some(slot))
    {
        Some(chain) => Ok(chain.name.clone()),
        None => bail!("no configured chain uses sidechain slot {slot}; pass --name"),
    }
}

fn report_delete(what: &str, removed: bool) {
    if removed {
        println!("{what} starter deleted");
    } else {
        println!("no {what} starter to delete");
    }
}
