//! Tempero
//!
//! Command-line client for the shop's inventory and sales backend: list and
//! edit products, record sales from a cart of products, and report totals.

mod client;
mod config;
mod export;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use tempero_core::money::format_brl;
use tempero_core::{
    Cart, Clock, InventoryService, InventoryView, Notifier, PaymentMethod, Product, ProductApi, Record, RecordView,
    Sale, SalesApi, SalesService, SalesView, Selection, SystemClock, TimeWindow,
};

use client::RestClient;
use config::{Config, FileConfig};
use render::ConsoleNotifier;

#[derive(Parser, Debug)]
#[command(name = "tempero")]
#[command(about = "Inventory and sales client for the Tempero shop backend")]
struct Args {
    /// Path to the config file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Backend base URL (overrides config.toml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the product inventory
    Products {
        #[command(subcommand)]
        action: ProductCommand,
    },

    /// Record and review sales
    Sales {
        #[command(subcommand)]
        action: SalesCommand,
    },

    /// Show the backend's sales totals
    Summary,
}

/// Filters shared by the list commands
#[derive(clap::Args, Debug)]
struct ListFilters {
    /// Category to show ("all" for every category)
    #[arg(long, default_value = "all")]
    category: String,

    /// Only records whose product or brand contains this text
    #[arg(long, default_value = "")]
    search: String,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Items per page (overrides config.toml)
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Period {
    Daily,
    Weekly,
    Monthly,
    All,
}

/// Date filters for sale listings
#[derive(clap::Args, Debug)]
struct DateFilters {
    /// Sales from today, this week or this month
    #[arg(long, value_enum, conflicts_with_all = ["year", "month"])]
    period: Option<Period>,

    /// Sales from this year (combine with --month for a single month)
    #[arg(long)]
    year: Option<i32>,

    /// Sales from this month, 1-12 (in every year unless --year is given)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

impl DateFilters {
    /// Listings start on today's sales unless told otherwise
    fn window(&self) -> TimeWindow {
        if self.year.is_some() || self.month.is_some() {
            return TimeWindow::Period {
                year: Selection::from(self.year),
                month: Selection::from(self.month.map(|m| m - 1)),
            };
        }
        match self.period {
            None | Some(Period::Daily) => TimeWindow::Daily,
            Some(Period::Weekly) => TimeWindow::Weekly,
            Some(Period::Monthly) => TimeWindow::Monthly,
            Some(Period::All) => TimeWindow::Any,
        }
    }
}

/// Product form
#[derive(clap::Args, Debug)]
struct ProductFields {
    #[arg(long)]
    category: String,

    /// Description, shown as the product name
    #[arg(long)]
    detail: String,

    #[arg(long)]
    brand: String,

    /// Purchase price in reais
    #[arg(long)]
    purchase_price: f64,

    /// Sale price in reais
    #[arg(long)]
    sale_price: f64,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    expiration: String,
}

impl From<ProductFields> for Product {
    fn from(fields: ProductFields) -> Self {
        Self {
            id: None,
            category: fields.category.trim().to_string(),
            detail: fields.detail.trim().to_string(),
            brand: fields.brand.trim().to_string(),
            purchase_price: fields.purchase_price,
            sale_price: fields.sale_price,
            stock_quantity: fields.stock,
            expiration: fields.expiration.trim().to_string(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    /// List products
    List {
        #[command(flatten)]
        filters: ListFilters,
    },

    /// Show one product
    Show {
        /// Product ID
        id: i64,
    },

    /// Add a new product
    Add {
        #[command(flatten)]
        fields: ProductFields,
    },

    /// Replace a product's fields
    Update {
        /// Product ID
        id: i64,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product by ID
    Delete {
        /// Product ID
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum SalesCommand {
    /// List sales (today's by default)
    List {
        #[command(flatten)]
        filters: ListFilters,

        #[command(flatten)]
        dates: DateFilters,
    },

    /// Record a sale of one or more products, dated today
    Record {
        /// Product to sell as ID or ID:QUANTITY (repeatable; quantity defaults to 1)
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<(i64, u32)>,

        /// Payment method: dinheiro, pix, debito or credito
        #[arg(long, default_value = "dinheiro")]
        payment: PaymentMethod,
    },

    /// Change fields of a recorded sale
    Update {
        /// Sale ID
        id: i64,

        /// Sale date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        product: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        purchase_price: Option<f64>,

        #[arg(long)]
        sale_price: Option<f64>,

        #[arg(long)]
        quantity: Option<u32>,

        #[arg(long)]
        payment: Option<String>,
    },

    /// Delete a sale by ID
    Delete {
        /// Sale ID
        id: i64,
    },

    /// Export the filtered sales to a CSV file
    Export {
        /// Path to output CSV file
        file: PathBuf,

        #[arg(long, default_value = "all")]
        category: String,

        #[arg(long, default_value = "")]
        search: String,

        #[command(flatten)]
        dates: DateFilters,
    },
}

/// Parse `ID` or `ID:QUANTITY`
fn parse_item(raw: &str) -> Result<(i64, u32), String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, Some(quantity)),
        None => (raw, None),
    };
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid product id '{}'", id.trim()))?;
    let quantity = match quantity {
        Some(q) => q
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid quantity '{}'", q.trim()))?,
        None => 1,
    };
    Ok((id, quantity))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: &Path, api_url: Option<String>) -> Result<Config> {
    let file_config = FileConfig::load_or_default(path)?;
    Config::from_file(&file_config, api_url)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args.config, args.api_url)?;
    tracing::debug!(api_url = %config.api_url, page_size = config.page_size, "Configuration loaded");

    let client = RestClient::new(&config)?;
    let notifier = ConsoleNotifier;

    match args.command {
        Command::Products { action } => handle_product_command(action, &config, &client, &notifier).await,
        Command::Sales { action } => handle_sales_command(action, &config, &client, &notifier).await,
        Command::Summary => handle_summary(&config, &client, &notifier).await,
    }
}

/// Print the view's pending alert and fail
fn refresh_failed<R, C>(view: &RecordView<R, C>, notifier: &impl Notifier) -> anyhow::Error
where
    R: Record + Clone,
    C: Clock,
{
    if let Some(alert) = view.alert().take() {
        let message = alert.message.clone();
        notifier.notify(alert);
        return anyhow::anyhow!(message);
    }
    anyhow::anyhow!("Failed to load data from the backend")
}

/// Apply list filters to a loaded view. An out-of-range page is clamped with a warning.
fn apply_filters<R, C>(view: &mut RecordView<R, C>, filters: &ListFilters, config: &Config)
where
    R: Record + Clone,
    C: Clock,
{
    view.set_page_size(filters.page_size.unwrap_or(config.page_size));
    view.set_category(&filters.category);
    view.set_search(filters.search.trim());
    let shown = view.request_page(filters.page);
    if shown != filters.page {
        tracing::warn!(
            "Page {} does not exist, showing page {} of {}",
            filters.page,
            shown,
            view.pagination().total_pages().max(1)
        );
    }
}

/// Handle product subcommands
async fn handle_product_command(
    action: ProductCommand,
    config: &Config,
    client: &RestClient,
    notifier: &ConsoleNotifier,
) -> Result<()> {
    let service = InventoryService::new(client, notifier);

    match action {
        ProductCommand::List { filters } => {
            let mut view = InventoryView::new(SystemClock, config.page_size);
            if !view.refresh(client).await {
                return Err(refresh_failed(&view, notifier));
            }
            apply_filters(&mut view, &filters, config);

            if view.visible().is_empty() {
                println!("{}", render::page_footer(view.pagination()));
                return Ok(());
            }
            println!("{}", render::product_table(view.visible()));
            println!("{}", render::page_footer(view.pagination()));
            Ok(())
        }

        ProductCommand::Show { id } => {
            let product = client
                .find_product(id)
                .await
                .with_context(|| format!("Failed to load product {}", id))?;
            println!("{}", render::product_detail(&product));
            Ok(())
        }

        ProductCommand::Add { fields } => {
            let product = Product::from(fields);
            warn_unknown_category(config, &product.category);
            let existing = client.list_products().await.context("Failed to load products")?;

            let saved = service.create(&product, &existing).await?;
            println!("{}", render::product_detail(&saved));
            Ok(())
        }

        ProductCommand::Update { id, fields } => {
            let product = Product::from(fields);
            warn_unknown_category(config, &product.category);
            let existing = client.list_products().await.context("Failed to load products")?;

            let saved = service.update(id, &product, &existing).await?;
            println!("{}", render::product_detail(&saved));
            Ok(())
        }

        ProductCommand::Delete { id } => {
            service.delete(id).await?;
            Ok(())
        }
    }
}

fn warn_unknown_category(config: &Config, category: &str) {
    if !category.is_empty() && !config.knows_category(category) {
        tracing::warn!(
            "Category '{}' is not one of the configured categories: {}",
            category,
            config.categories.join(", ")
        );
    }
}

/// Handle sales subcommands
async fn handle_sales_command(
    action: SalesCommand,
    config: &Config,
    client: &RestClient,
    notifier: &ConsoleNotifier,
) -> Result<()> {
    let service = SalesService::new(client, notifier);

    match action {
        SalesCommand::List { filters, dates } => {
            let mut view = load_sales(config, client, notifier).await?;
            view.set_window(dates.window());
            apply_filters(&mut view, &filters, config);

            if !view.visible().is_empty() {
                println!("{}", render::sale_table(view.visible()));
            }
            println!("{}", render::page_footer(view.pagination()));

            let profit: f64 = view.filtered().iter().map(Sale::profit).sum();
            let total: f64 = view.filtered().iter().map(Sale::total).sum();
            println!(
                "Sold: {} | Profit: {}",
                format_brl(total),
                format_brl(profit)
            );
            Ok(())
        }

        SalesCommand::Record { items, payment } => {
            let products = client.list_products().await.context("Failed to load products")?;
            let cart = match Cart::from_picks(&products, &items, payment) {
                Ok(cart) => cart,
                Err(e) => {
                    notifier.notify(e.notification());
                    return Err(e.into());
                }
            };

            let saved = service.checkout(&cart, SystemClock.today()).await?;
            println!(
                "{} line(s), total {} paid with {}",
                saved.len(),
                format_brl(cart.total()),
                cart.payment
            );
            Ok(())
        }

        SalesCommand::Update {
            id,
            date,
            category,
            product,
            brand,
            purchase_price,
            sale_price,
            quantity,
            payment,
        } => {
            let sales = client.list_sales().await.context("Failed to load sales")?;
            let mut sale = sales
                .into_iter()
                .find(|s| s.id == Some(id))
                .with_context(|| format!("Sale {} not found", id))?;

            if let Some(date) = date {
                sale.sale_date = date;
            }
            if let Some(category) = category {
                sale.category = category;
            }
            if let Some(product) = product {
                sale.product = product;
            }
            if let Some(brand) = brand {
                sale.brand = brand;
            }
            if purchase_price.is_some() {
                sale.purchase_price = purchase_price;
            }
            if let Some(price) = sale_price {
                sale.sale_price = price;
            }
            if quantity.is_some() {
                sale.quantity_sold = quantity;
            }
            if let Some(payment) = payment {
                sale.payment_method = payment;
            }

            let saved = service.update(id, &sale).await?;
            println!("{}", render::sale_table(std::slice::from_ref(&saved)));
            Ok(())
        }

        SalesCommand::Delete { id } => {
            service.delete(id).await?;
            Ok(())
        }

        SalesCommand::Export {
            file,
            category,
            search,
            dates,
        } => {
            let mut view = load_sales(config, client, notifier).await?;
            view.set_window(dates.window());
            view.set_category(&category);
            view.set_search(search.trim());

            export::export_sales_to_csv(view.filtered(), &file)?;
            println!("Exported {} sale(s) to {}", view.filtered().len(), file.display());
            Ok(())
        }
    }
}

async fn load_sales(config: &Config, client: &RestClient, notifier: &ConsoleNotifier) -> Result<SalesView> {
    let mut view = SalesView::new(SystemClock, config.page_size);
    if !view.refresh(client).await {
        return Err(refresh_failed(&view, notifier));
    }
    Ok(view)
}

async fn handle_summary(config: &Config, client: &RestClient, notifier: &ConsoleNotifier) -> Result<()> {
    let view = load_sales(config, client, notifier).await?;

    println!("=============================================");
    println!("Sales Summary");
    println!("=============================================");
    println!("{}", render::summary_block(view.summary()));
    println!("---------------------------------------------");
    println!("{} sale(s) recorded today", view.filtered().len());
    Ok(())
}
