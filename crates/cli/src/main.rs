//! Vitrine CLI - a storefront frontend for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse and search the catalog
//! vitrine products list --category Lighting --sort-by price --sort-order desc
//! vitrine search "desk lamp"
//! vitrine products show 5
//!
//! # Authentication
//! vitrine auth register shopper@example.com --password hunter2
//! vitrine auth login shopper@example.com --password hunter2
//! vitrine auth whoami
//!
//! # Cart (requires login)
//! vitrine cart add 5 --quantity 2
//! vitrine cart show
//!
//! # Comparison set
//! vitrine compare toggle 5
//! vitrine compare show
//! ```
//!
//! The CLI is a thin view over `vitrine-client`: it reads store state,
//! requests mutations, and prints. All optimistic/rollback logic lives
//! in the stores.

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary's output IS stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod app;
mod commands;

use app::App;
use commands::products::{SortByArg, SortOrderArg};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Terminal storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Search products by name and description
    Search {
        /// Search text
        text: String,
        /// Page size
        #[arg(long, default_value_t = 12)]
        limit: u32,
        /// Offset of the first result
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Inspect and mutate the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the comparison set (up to 4 products)
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
    /// Log in, register, and inspect the current identity
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products with filters, sorting, and paging
    List {
        /// Restrict to a category
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,

        /// Sort field
        #[arg(long, value_enum, default_value_t = SortByArg::Id)]
        sort_by: SortByArg,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = SortOrderArg::Asc)]
        sort_order: SortOrderArg,

        /// Page size
        #[arg(long, default_value_t = 12)]
        limit: u32,

        /// Offset of the first result
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Show one product with its description
    Show {
        /// Product id
        id: i64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart, reconciled with the server
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,

        /// Number of units
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=999))]
        quantity: u32,
    },
    /// Change a cart line's quantity
    Set {
        /// Cart item id (see `cart show`)
        item_id: i64,

        /// New quantity
        #[arg(value_parser = clap::value_parser!(u32).range(1..=999))]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Cart item id
        item_id: i64,
    },
}

#[derive(Subcommand)]
enum CompareAction {
    /// Show the comparison set side by side
    Show,
    /// Add a product to the comparison
    Add {
        /// Product id
        product_id: i64,
    },
    /// Remove a product from the comparison
    Remove {
        /// Product id
        product_id: i64,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        /// Product id
        product_id: i64,
    },
    /// Empty the comparison set
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Exchange credentials for a session
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Account email
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Discard the session
    Logout,
    /// Show the current identity
    Whoami,
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to warnings only so
    // normal output stays clean.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::init()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                min_price,
                max_price,
                search,
                sort_by,
                sort_order,
                limit,
                offset,
            } => {
                commands::products::list(
                    &app, category, min_price, max_price, search, sort_by, sort_order, limit,
                    offset,
                )
                .await;
            }
            ProductsAction::Show { id } => commands::products::show(&app, id).await,
        },
        Commands::Search {
            text,
            limit,
            offset,
        } => commands::products::search(&app, &text, limit, offset).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&mut app).await,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut app, product_id, quantity).await,
            CartAction::Set { item_id, quantity } => {
                commands::cart::set_quantity(&mut app, item_id, quantity).await;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&mut app, item_id).await,
        },
        Commands::Compare { action } => match action {
            CompareAction::Show => commands::compare::show(&app).await,
            CompareAction::Add { product_id } => commands::compare::add(&mut app, product_id).await,
            CompareAction::Remove { product_id } => commands::compare::remove(&mut app, product_id),
            CompareAction::Toggle { product_id } => {
                commands::compare::toggle(&mut app, product_id).await;
            }
            CompareAction::Clear => commands::compare::clear(&mut app),
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&mut app, &email, &password).await;
            }
            AuthAction::Register { email, password } => {
                commands::auth::register(&mut app, &email, &password).await;
            }
            AuthAction::Logout => commands::auth::logout(&mut app),
            AuthAction::Whoami => commands::auth::whoami(&mut app).await,
        },
    }
    Ok(())
}
