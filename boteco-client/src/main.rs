//! boteco - read the dashboard collections from the command line
//!
//! Runs in mock mode unless an API URL is given (`--api-url` or
//! `BOTECO_API_BASE_URL`), in which case it connects first.

mod render;

use anyhow::Result;
use boteco_client::{ClientConfig, ClientResult, DataService, Entity, EntityKind};
use clap::{Parser, Subcommand};
use shared::{Dish, Order, StaffMember, StockItem, Table};

/// Boteco dashboard data access
#[derive(Parser, Debug)]
#[command(name = "boteco", author, version, about, long_about = None)]
struct Args {
    /// API base URL (switches to remote mode)
    #[arg(long)]
    api_url: Option<String>,

    /// Stay on the fixtures even if a base URL is configured
    #[arg(long, conflicts_with = "api_url")]
    mock: bool,

    /// Check the backend health endpoint before connecting
    #[arg(long)]
    verify: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a collection (tables, orders, dishes, stock, staff)
    List { entity: EntityKind },

    /// Save and inspect local snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
}

#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Fetch a collection and store it
    Save {
        entity: EntityKind,
        /// Snapshot key (defaults to the entity name)
        #[arg(long)]
        key: Option<String>,
    },
    /// Print a stored snapshot as JSON
    Show { key: String },
    /// List stored snapshot keys
    Keys,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boteco_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env();
    let service = DataService::new(&config)?;

    let target = if args.mock {
        None
    } else {
        args
            .api_url
            .clone()
            .or_else(|| service.default_base_url().map(str::to_string))
    };
    if let Some(url) = target {
        if args.verify {
            service.connect_verified(&url).await?;
        } else {
            service.connect(&url).await;
        }
    }

    match args.command {
        Command::List { entity } => {
            let output = match entity {
                EntityKind::Tables => render::tables(&service.fetch_tables().await?),
                EntityKind::Orders => render::orders(&service.fetch_orders().await?),
                EntityKind::Dishes => render::dishes(&service.fetch_dishes().await?),
                EntityKind::Stock => render::stock(&service.fetch_stock().await?),
                EntityKind::Staff => render::staff(&service.fetch_staff().await?),
            };
            println!("{output}");
        }
        Command::Snapshot(SnapshotCommand::Save { entity, key }) => {
            let key = key.unwrap_or_else(|| entity.to_string());
            let count = match entity {
                EntityKind::Tables => save_snapshot::<Table>(&service, &key).await?,
                EntityKind::Orders => save_snapshot::<Order>(&service, &key).await?,
                EntityKind::Dishes => save_snapshot::<Dish>(&service, &key).await?,
                EntityKind::Stock => save_snapshot::<StockItem>(&service, &key).await?,
                EntityKind::Staff => save_snapshot::<StaffMember>(&service, &key).await?,
            };
            println!("Saved {count} {entity} records under '{key}'");
        }
        Command::Snapshot(SnapshotCommand::Show { key }) => {
            match service.load_snapshot::<serde_json::Value>(&key)? {
                Some(records) => println!("{}", serde_json::to_string_pretty(&records)?),
                None => println!("No snapshot stored under '{key}'"),
            }
        }
        Command::Snapshot(SnapshotCommand::Keys) => {
            for key in service.snapshots()?.keys()? {
                println!("{key}");
            }
        }
    }

    Ok(())
}

async fn save_snapshot<E: Entity>(service: &DataService, key: &str) -> ClientResult<usize> {
    let records = service.fetch::<E>().await?;
    service.persist_snapshot(key, &records)?;
    Ok(records.len())
}
