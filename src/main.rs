use catalogx::{BrandTable, Catalog, CatalogConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Query a product catalog from the command line
#[derive(Parser, Debug)]
#[command(name = "catalogx")]
#[command(about = "Fuzzy product search and similar product recommendations", long_about = None)]
struct Args {
    /// Product dump (JSON array, {"products": [...]}, or .jsonl)
    #[arg(short, long)]
    data: PathBuf,

    /// Brand synonym table (JSON object of korean -> variants)
    #[arg(short, long)]
    brands: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search products by name, manufacturer or brand
    Search { query: String },
    /// Recommend products similar to one product
    Recommend {
        product_id: String,
        #[arg(short, long, default_value_t = 4)]
        limit: usize,
    },
    /// List products whose big category contains a keyword
    Category {
        keyword: String,
        #[arg(short, long, default_value_t = catalogx_core::store::DEFAULT_CATEGORY_LIMIT)]
        limit: usize,
    },
    /// Show one product
    Product { product_id: String },
    /// Show cache statistics
    Stats,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting catalogx v{}", env!("CARGO_PKG_VERSION"));

    let brands = match &args.brands {
        Some(path) => {
            info!("Brand table: {:?}", path);
            BrandTable::from_file(path)?
        }
        None => BrandTable::default(),
    };
    info!("Data file: {:?}", args.data);
    let catalog = Catalog::from_file(&args.data, brands, CatalogConfig::default())?;

    match args.command {
        Command::Search { query } => print_json(&catalog.search(&query)?),
        Command::Recommend { product_id, limit } => {
            print_json(&catalog.recommend(&product_id, limit)?)
        }
        Command::Category { keyword, limit } => {
            print_json(&catalog.by_big_category(&keyword, limit)?)
        }
        Command::Product { product_id } => print_json(&catalog.product(&product_id)?),
        Command::Stats => print_json(&catalog.stats()),
    }
}
