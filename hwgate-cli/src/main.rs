//! hwgate command-line interface.
//!
//! Inspects the current machine's fingerprint and manages the authorized
//! allow-list. Typical bootstrap:
//!
//!   hwgate fingerprint              # print this machine's fingerprint
//!   hwgate --master <FP> add <FP>   # authorize another machine (master only)
//!   hwgate status                   # exit 0 when authorized, 1 otherwise

use anyhow::Result;
use clap::{Parser, Subcommand};
use hwgate_fingerprint::{DeviceInfo, Fingerprint};
use hwgate_store::{AuthStore, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hwgate")]
#[command(about = "Hardware-fingerprint gated authorization")]
struct Args {
    /// Path to the allow-list file (defaults to the platform data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Master fingerprint
    #[arg(long, env = "HWGATE_MASTER")]
    master: Option<Fingerprint>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show fingerprint, authorization, and master status for this machine
    Status {
        /// Print nothing; report through the exit code only
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the current machine's fingerprint
    Fingerprint,
    /// Add a fingerprint to the allow-list (master only)
    Add {
        /// Fingerprint to authorize
        hwid: String,
    },
    /// Remove a fingerprint from the allow-list (master only)
    Remove {
        /// Fingerprint to revoke
        hwid: String,
    },
    /// List allow-list entries (master only)
    List,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = StoreConfig::new(args.master);
    if let Some(path) = args.store {
        config = config.with_path(path);
    }

    match args.command {
        Command::Fingerprint => {
            println!("{}", Fingerprint::current());
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { quiet } => status(config, quiet),
        Command::Add { hwid } => {
            let store = AuthStore::open(config)?;
            store.add(&hwid)?;
            println!("added {}", hwid.trim().to_uppercase());
            Ok(ExitCode::SUCCESS)
        }
        Command::Remove { hwid } => {
            let store = AuthStore::open(config)?;
            store.remove(&hwid)?;
            println!("removed {}", hwid.trim().to_uppercase());
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let store = AuthStore::open(config)?;
            let entries = store.list()?;
            println!("Authorized fingerprints ({}):", entries.len());
            for entry in &entries {
                println!("  {entry}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn status(config: StoreConfig, quiet: bool) -> Result<ExitCode> {
    let master_unset = config.master.is_none();
    let store = AuthStore::open(config)?;
    let fingerprint = Fingerprint::current();
    let authorized = store.is_authorized();

    if !quiet {
        let info = DeviceInfo::collect();
        println!("Host:        {} ({} {})", info.hostname, info.os_name, info.arch);
        println!("Fingerprint: {fingerprint}");
        println!("Store:       {}", store.path().display());
        println!("Authorized:  {}", if authorized { "yes" } else { "no" });
        println!("Master:      {}", if store.is_master() { "yes" } else { "no" });

        if master_unset {
            println!();
            println!("No master fingerprint is configured; the allow-list cannot be edited.");
            println!("To make this machine the master, rerun with:");
            println!("  --master {fingerprint}   (or set HWGATE_MASTER)");
        }
    }

    Ok(if authorized {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
