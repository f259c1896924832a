//! Pedidos CLI - operator tools for the relay's order document.
//!
//! # Usage
//!
//! ```bash
//! # Every order, one JSON object per line
//! pedidos list
//!
//! # Orders still waiting for a store's PDV
//! pedidos list --store loja1 --status pending
//!
//! # Acknowledge an order by hand
//! pedidos receive 1714564800123
//!
//! # Drop received orders so the document stops growing
//! pedidos prune
//! ```
//!
//! The document path comes from `--db`, then `RELAY_DB_FILE`, then `db.json`.
//! The CLI does not coordinate with a running relay; prefer pruning while the
//! relay is stopped.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pedidos_core::ReceiptStatus;
use pedidos_relay::config::RelayConfig;
use pedidos_relay::store::OrderStore;

mod commands;

#[derive(Parser)]
#[command(name = "pedidos")]
#[command(author, version, about = "Pedidos relay CLI tools")]
struct Cli {
    /// Path of the order document (defaults to `RELAY_DB_FILE` or db.json)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print orders as JSON lines
    List {
        /// Only orders for this store
        #[arg(short, long)]
        store: Option<String>,

        /// Only orders in this state (`pending` or `received`)
        #[arg(long)]
        status: Option<ReceiptStatus>,
    },
    /// Mark an order as received
    Receive {
        /// Order id
        id: String,
    },
    /// Remove every received order from the document
    Prune,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db = match cli.db {
        Some(path) => path,
        None => RelayConfig::from_env()?.db_file,
    };
    tracing::debug!(db = %db.display(), "Using order document");

    let store = OrderStore::file(db);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::List {
            store: store_id,
            status,
        } => {
            let filter = commands::orders::ListFilter { store_id, status };
            commands::orders::list(&store, &filter, &mut stdout).await?;
        }
        Commands::Receive { id } => {
            commands::orders::receive(&store, &id, &mut stdout).await?;
        }
        Commands::Prune => {
            commands::orders::prune(&store, &mut stdout).await?;
        }
    }
    Ok(())
}
