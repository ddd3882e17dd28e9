//! CSV export of sales

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use tempero_core::Sale;

use crate::render::display_date;

/// One exported line; money columns are plain numbers so spreadsheets can sum them
#[derive(Debug, Serialize)]
struct SaleRecord<'a> {
    id: Option<i64>,
    date: String,
    category: &'a str,
    product: &'a str,
    brand: &'a str,
    quantity: u32,
    purchase_price: f64,
    sale_price: f64,
    total: f64,
    profit: f64,
    payment_method: &'a str,
}

impl<'a> From<&'a Sale> for SaleRecord<'a> {
    fn from(sale: &'a Sale) -> Self {
        Self {
            id: sale.id,
            date: display_date(&sale.sale_date),
            category: &sale.category,
            product: &sale.product,
            brand: &sale.brand,
            quantity: sale.quantity_sold.unwrap_or(1),
            purchase_price: sale.purchase_price.unwrap_or(0.0),
            sale_price: sale.sale_price,
            total: sale.total(),
            profit: sale.profit(),
            payment_method: &sale.payment_method,
        }
    }
}

/// Write `sales` to `path`, replacing any existing file
pub fn export_sales_to_csv(sales: &[Sale], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for sale in sales {
        wtr.serialize(SaleRecord::from(sale))?;
    }
    wtr.flush()?;
    Ok(())
}
