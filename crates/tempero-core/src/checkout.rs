//! Sale checkout: picking products and quantities before recording sales

use chrono::NaiveDate;

use crate::dates;
use crate::error::ValidationError;
use crate::models::{PaymentMethod, Product, Sale};

/// One selected product and how many units go out
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.sale_price * f64::from(self.quantity)
    }
}

/// Products selected for one checkout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    pub payment: PaymentMethod,
}

impl Cart {
    pub fn new(payment: PaymentMethod) -> Self {
        Self {
            lines: Vec::new(),
            payment,
        }
    }

    /// Build a cart from `(product id, quantity)` picks against a product snapshot
    pub fn from_picks(products: &[Product], picks: &[(i64, u32)], payment: PaymentMethod) -> Result<Self, ValidationError> {
        let mut cart = Cart::new(payment);
        for &(id, quantity) in picks {
            let product = products
                .iter()
                .find(|p| p.id == Some(id))
                .ok_or(ValidationError::UnknownProduct(id))?;
            cart.select(product.clone(), quantity);
        }
        Ok(cart)
    }

    /// Select a product. Selecting the same product again replaces its quantity.
    pub fn select(&mut self, product: Product, quantity: u32) {
        match self
            .lines
            .iter_mut()
            .find(|line| line.product.id.is_some() && line.product.id == product.id)
        {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine { product, quantity }),
        }
    }

    pub fn deselect(&mut self, product_id: i64) {
        self.lines.retain(|line| line.product.id != Some(product_id));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Running total shown while picking
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Checks done before anything is sent: something selected, each line
    /// with a quantity, nothing out of stock.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if let Some(line) = self.lines.iter().find(|line| line.product.stock_quantity == 0) {
            return Err(ValidationError::OutOfStock(line.product.detail.clone()));
        }
        if self.lines.iter().any(|line| line.quantity < 1) {
            return Err(ValidationError::BelowMinimum {
                field: "quantity",
                min: 1.0,
            });
        }
        Ok(())
    }

    /// One sale per line, dated `today`, copying the product fields
    pub fn to_sales(&self, today: NaiveDate) -> Vec<Sale> {
        let sale_date = dates::sale_date_string(today);
        self.lines
            .iter()
            .map(|line| Sale {
                id: None,
                sale_date: sale_date.clone(),
                category: line.product.category.clone(),
                product: line.product.detail.clone(),
                brand: line.product.brand.clone(),
                purchase_price: Some(line.product.purchase_price),
                sale_price: line.product.sale_price,
                quantity_sold: Some(line.quantity),
                payment_method: self.payment.as_str().to_string(),
                profit: None,
            })
            .collect()
    }
}
