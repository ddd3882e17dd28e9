//! Terminal output: tables, page links, summary block and notifications

use tabled::settings::Style;
use tabled::{Table, Tabled};

use tempero_core::money::{format_brl, format_percent};
use tempero_core::{Level, Notification, Notifier, PageLink, Pagination, Product, Sale, SalesSummary, normalize};

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Product")]
    detail: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Cost")]
    purchase_price: String,
    #[tabled(rename = "Price")]
    sale_price: String,
    #[tabled(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Expires")]
    expiration: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: display_id(product.id),
            category: product.category.clone(),
            detail: product.detail.clone(),
            brand: product.brand.clone(),
            purchase_price: format_brl(product.purchase_price),
            sale_price: format_brl(product.sale_price),
            stock: product.stock_quantity,
            expiration: display_date(&product.expiration),
        }
    }
}

#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Price")]
    sale_price: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Payment")]
    payment: String,
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        Self {
            id: display_id(sale.id),
            date: display_date(&sale.sale_date),
            category: sale.category.clone(),
            product: sale.product.clone(),
            brand: sale.brand.clone(),
            quantity: sale.quantity_sold.unwrap_or(1),
            sale_price: format_brl(sale.sale_price),
            profit: format_brl(sale.profit()),
            payment: display_payment(&sale.payment_method),
        }
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

/// `DD/MM/YYYY`, or `-` when the stored value is not a date
pub fn display_date(raw: &str) -> String {
    normalize(raw)
        .to_naive()
        .map_or_else(|| "-".to_string(), |date| date.format("%d/%m/%Y").to_string())
}

/// Readable label for a stored payment method; unknown values are shown as stored
fn display_payment(raw: &str) -> String {
    raw.parse::<tempero_core::PaymentMethod>()
        .map_or_else(|_| raw.to_string(), |method| method.to_string())
}

pub fn product_table(products: &[Product]) -> String {
    let mut table = Table::new(products.iter().map(ProductRow::from));
    table.with(Style::sharp());
    table.to_string()
}

pub fn sale_table(sales: &[Sale]) -> String {
    let mut table = Table::new(sales.iter().map(SaleRow::from));
    table.with(Style::sharp());
    table.to_string()
}

pub fn product_detail(product: &Product) -> String {
    format!(
        "Product #{}\n  Category:   {}\n  Product:    {}\n  Brand:      {}\n  Cost:       {}\n  Price:      {}\n  Stock:      {}\n  Expires:    {}",
        display_id(product.id),
        product.category,
        product.detail,
        product.brand,
        format_brl(product.purchase_price),
        format_brl(product.sale_price),
        product.stock_quantity,
        display_date(&product.expiration),
    )
}

/// Page links with the current page bracketed, e.g. `1 ... 4 [5] 6 ... 10`
pub fn page_bar(pagination: &Pagination) -> String {
    pagination
        .links()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(page) if page == pagination.current_page() => format!("[{}]", page),
            PageLink::Page(page) => page.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Footer under a listing: item count and page links
pub fn page_footer(pagination: &Pagination) -> String {
    if pagination.total_items() == 0 {
        return "No records match the current filters.".to_string();
    }
    let range = pagination.range();
    format!(
        "Showing {}-{} of {} | Page {} of {}: {}",
        range.start + 1,
        range.end,
        pagination.total_items(),
        pagination.current_page(),
        pagination.total_pages(),
        page_bar(pagination)
    )
}

pub fn summary_block(summary: &SalesSummary) -> String {
    format!(
        "Total sold:       {}\nTotal purchased:  {}\nGross profit:     {}\nProfit margin:    {}",
        format_brl(summary.total_sold),
        format_brl(summary.total_purchased),
        format_brl(summary.gross_profit),
        format_percent(summary.profit_margin),
    )
}

/// Prints notifications to the terminal; problems go to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn line(notification: &Notification) -> String {
        let tag = match notification.level {
            Level::Success => "ok",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        format!("[{}] {}", tag, notification.message)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = Self::line(&notification);
        match notification.level {
            Level::Success | Level::Info => println!("{}", line),
            Level::Warning | Level::Error => eprintln!("{}", line),
        }
    }
}
