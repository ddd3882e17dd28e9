//! Form validation for products and sales
//!
//! Runs before any backend call. A rejected form causes no mutation.

use crate::dates;
use crate::error::ValidationError;
use crate::models::{PaymentMethod, Product, Sale};

/// Smallest accepted price
pub const MIN_PRICE: f64 = 0.01;

/// Whether a product form creates a new product or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Insert,
    Edit,
}

/// Validate a product form against the current product snapshot.
///
/// - text fields must not be blank
/// - prices at least [`MIN_PRICE`]
/// - new products need at least one unit in stock
/// - the description must not repeat another product's (case-insensitive)
pub fn validate_product(product: &Product, existing: &[Product], mode: FormMode) -> Result<(), ValidationError> {
    require("category", &product.category)?;
    require("detail", &product.detail)?;
    require("brand", &product.brand)?;
    require("expiration", &product.expiration)?;

    at_least("purchase price", product.purchase_price, MIN_PRICE)?;
    at_least("sale price", product.sale_price, MIN_PRICE)?;
    if mode == FormMode::Insert && product.stock_quantity < 1 {
        return Err(ValidationError::BelowMinimum {
            field: "stock quantity",
            min: 1.0,
        });
    }

    let detail = product.detail.trim().to_lowercase();
    let duplicate = existing.iter().find(|other| {
        let same_record = mode == FormMode::Edit && other.id.is_some() && other.id == product.id;
        !same_record && other.detail.trim().to_lowercase() == detail
    });
    if let Some(other) = duplicate {
        return Err(ValidationError::DuplicateDetail(other.detail.clone()));
    }

    Ok(())
}

/// Validate an edited sale. Returns the parsed payment method.
pub fn validate_sale(sale: &Sale) -> Result<PaymentMethod, ValidationError> {
    require("product", &sale.product)?;
    require("sale date", &sale.sale_date)?;
    if dates::normalize(&sale.sale_date).is_zero() {
        return Err(ValidationError::SaleDate(sale.sale_date.clone()));
    }

    at_least("sale price", sale.sale_price, MIN_PRICE)?;
    if sale.quantity_sold.is_some_and(|q| q < 1) {
        return Err(ValidationError::BelowMinimum {
            field: "quantity sold",
            min: 1.0,
        });
    }

    sale.payment_method
        .parse::<PaymentMethod>()
        .map_err(ValidationError::PaymentMethod)
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < min {
        return Err(ValidationError::BelowMinimum { field, min });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: Option<i64>, detail: &str) -> Product {
        Product {
            id,
            category: "Temperos".to_string(),
            detail: detail.to_string(),
            brand: "Kitano".to_string(),
            purchase_price: 3.0,
            sale_price: 5.0,
            stock_quantity: 10,
            expiration: "2026-05-01".to_string(),
        }
    }

    fn sale() -> Sale {
        Sale {
            id: Some(1),
            sale_date: "2025-03-07".to_string(),
            category: "Temperos".to_string(),
            product: "Colorau".to_string(),
            brand: "Kitano".to_string(),
            purchase_price: Some(3.0),
            sale_price: 5.0,
            quantity_sold: Some(2),
            payment_method: "pix".to_string(),
            profit: None,
        }
    }

    #[test]
    fn test_valid_new_product() {
        let existing = vec![product(Some(1), "Colorau")];
        assert_eq!(validate_product(&product(None, "Cominho"), &existing, FormMode::Insert), Ok(()));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let mut p = product(None, "Cominho");
        p.brand = "  ".to_string();
        assert_eq!(
            validate_product(&p, &[], FormMode::Insert),
            Err(ValidationError::Required("brand"))
        );
    }

    #[test]
    fn test_prices_must_be_positive() {
        let mut p = product(None, "Cominho");
        p.sale_price = 0.0;
        assert!(matches!(
            validate_product(&p, &[], FormMode::Insert),
            Err(ValidationError::BelowMinimum { field: "sale price", .. })
        ));

        p.sale_price = f64::NAN;
        assert!(validate_product(&p, &[], FormMode::Insert).is_err());
    }

    #[test]
    fn test_stock_required_only_on_insert() {
        let mut p = product(Some(3), "Cominho");
        p.stock_quantity = 0;
        assert!(validate_product(&p, &[], FormMode::Insert).is_err());
        assert_eq!(validate_product(&p, &[], FormMode::Edit), Ok(()));
    }

    #[test]
    fn test_duplicate_detail_ignores_case_and_spaces() {
        let existing = vec![product(Some(1), "Colorau 500g")];
        assert_eq!(
            validate_product(&product(None, " colorau 500G "), &existing, FormMode::Insert),
            Err(ValidationError::DuplicateDetail("Colorau 500g".to_string()))
        );
    }

    #[test]
    fn test_editing_keeps_own_detail() {
        let existing = vec![product(Some(1), "Colorau"), product(Some(2), "Cominho")];

        let mut edited = product(Some(1), "Colorau");
        edited.sale_price = 6.5;
        assert_eq!(validate_product(&edited, &existing, FormMode::Edit), Ok(()));

        let renamed = product(Some(1), "Cominho");
        assert!(validate_product(&renamed, &existing, FormMode::Edit).is_err());
    }

    #[test]
    fn test_valid_sale() {
        assert_eq!(validate_sale(&sale()), Ok(PaymentMethod::Pix));
    }

    #[test]
    fn test_sale_quantity_and_payment() {
        let mut s = sale();
        s.quantity_sold = Some(0);
        assert!(validate_sale(&s).is_err());

        let mut s = sale();
        s.payment_method = "fiado".to_string();
        assert!(matches!(validate_sale(&s), Err(ValidationError::PaymentMethod(_))));
    }

    #[test]
    fn test_sale_date_must_parse() {
        let mut s = sale();
        s.sale_date = "ontem".to_string();
        assert_eq!(validate_sale(&s), Err(ValidationError::SaleDate("ontem".to_string())));
    }
}
