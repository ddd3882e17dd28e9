//! Records exchanged with the backend
//!
//! Field names on the wire are the backend's (`categoria`, `precoVenda`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money;

/// Inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend ID (None until the product is saved)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "categoria", default)]
    pub category: String,
    /// Description, also used as the product's display name
    #[serde(rename = "detalhe", default)]
    pub detail: String,
    #[serde(rename = "marca", default)]
    pub brand: String,
    #[serde(rename = "precoCompra", default)]
    pub purchase_price: f64,
    #[serde(rename = "precoVenda", default)]
    pub sale_price: f64,
    #[serde(rename = "quantidadeEstoque", default)]
    pub stock_quantity: u32,
    /// Expiration date, `YYYY-MM-DD`
    #[serde(rename = "vencimento", default)]
    pub expiration: String,
}

/// Recorded sale. Product fields are copied at the time of sale, so a sale
/// keeps its figures even after the product is edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// `YYYY-MM-DD`, `DD/MM/YYYY` or a full timestamp, depending on age
    #[serde(rename = "dataVenda", default)]
    pub sale_date: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    /// Product detail at the time of sale
    #[serde(rename = "produto", default)]
    pub product: String,
    #[serde(rename = "marca", default)]
    pub brand: String,
    #[serde(rename = "precoCompra", default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(rename = "precoVenda", default)]
    pub sale_price: f64,
    #[serde(rename = "quantidadeVendida", default)]
    pub quantity_sold: Option<u32>,
    #[serde(rename = "formaPagamento", default)]
    pub payment_method: String,
    /// Computed by the backend on some endpoints; never sent back
    #[serde(rename = "lucro", default, skip_serializing)]
    pub profit: Option<f64>,
}

impl Sale {
    /// Profit for this sale, lenient about missing legacy fields
    pub fn profit(&self) -> f64 {
        money::profit(self.sale_price, self.purchase_price, self.quantity_sold)
    }

    /// Gross value of the sale (price times quantity, quantity defaulting to 1)
    pub fn total(&self) -> f64 {
        self.sale_price * f64::from(self.quantity_sold.unwrap_or(1))
    }
}

/// Aggregate totals computed by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    #[serde(rename = "totalVendido", default)]
    pub total_sold: f64,
    #[serde(rename = "totalComprado", default)]
    pub total_purchased: f64,
    #[serde(rename = "lucroBruto", default)]
    pub gross_profit: f64,
    /// Percentage, as reported by the backend
    #[serde(rename = "margemLucro", default)]
    pub profit_margin: f64,
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Dinheiro,
    Pix,
    Debito,
    Credito,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Dinheiro,
        PaymentMethod::Pix,
        PaymentMethod::Debito,
        PaymentMethod::Credito,
    ];

    /// Value stored in `formaPagamento`
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "dinheiro",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Debito => "debito",
            PaymentMethod::Credito => "credito",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Dinheiro => write!(f, "Cash"),
            PaymentMethod::Pix => write!(f, "Pix"),
            PaymentMethod::Debito => write!(f, "Debit card"),
            PaymentMethod::Credito => write!(f, "Credit card"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dinheiro" | "cash" => Ok(PaymentMethod::Dinheiro),
            "pix" => Ok(PaymentMethod::Pix),
            "debito" | "débito" | "debit" => Ok(PaymentMethod::Debito),
            "credito" | "crédito" | "credit" => Ok(PaymentMethod::Credito),
            other => Err(format!(
                "unknown payment method '{}' (expected one of: dinheiro, pix, debito, credito)",
                other
            )),
        }
    }
}
