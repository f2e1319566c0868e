//! LuxeMarket CLI - shopper state and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart with totals
//! lm-cli cart show
//!
//! # Empty the persisted wishlist
//! lm-cli wishlist clear
//!
//! # Browse the catalog
//! lm-cli catalog list --category electronics --sort price-asc
//!
//! # Point at another data directory
//! lm-cli --data-dir /var/lib/luxemarket cart show
//! ```
//!
//! # Commands
//!
//! - `cart show|clear` - Inspect or empty the cart
//! - `wishlist show|clear` - Inspect or empty the wishlist
//! - `catalog list` - List catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use luxemarket_storefront::catalog::SortOrder;
use luxemarket_storefront::config::DEFAULT_DATA_DIR;

mod commands;

#[derive(Parser)]
#[command(name = "lm-cli")]
#[command(author, version, about = "LuxeMarket CLI tools")]
struct Cli {
    /// Directory holding persisted shopper state
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or empty the cart
    Cart {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Inspect or empty the wishlist
    Wishlist {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the stored contents
    Show,
    /// Remove every entry
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only this category (e.g., `electronics`)
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = Sort::Newest)]
        sort: Sort,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Sort {
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Newest => Self::Newest,
            Sort::PriceAsc => Self::PriceAsc,
            Sort::PriceDesc => Self::PriceDesc,
            Sort::Popular => Self::Popular,
        }
    }
}

fn main() {
    // Load .env so STOREFRONT_DATA_DIR matches the server's
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storage = commands::state::open_storage(&cli.data_dir);
    match cli.command {
        Commands::Cart { action } => match action {
            StateAction::Show => commands::state::show_cart(storage)?,
            StateAction::Clear => {
                commands::state::clear_cart(storage)?;
            }
        },
        Commands::Wishlist { action } => match action {
            StateAction::Show => commands::state::show_wishlist(storage)?,
            StateAction::Clear => {
                commands::state::clear_wishlist(storage)?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
            } => commands::catalog::list(category, search, sort.into())?,
        },
    }
    Ok(())
}
