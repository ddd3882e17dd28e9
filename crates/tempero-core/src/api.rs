//! Backend collaborators
//!
//! The core never performs I/O itself. Front-ends hand it an implementation of
//! these traits (the CLI uses a REST client; tests use in-memory fakes).

use crate::error::ApiError;
use crate::filter::{FilterState, Selection};
use crate::models::{Product, Sale, SalesSummary};

/// Product storage
#[allow(async_fn_in_trait)]
pub trait ProductApi {
    /// Every product currently stored
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn find_product(&self, id: i64) -> Result<Product, ApiError>;

    /// Products in one category. Defaults to filtering the full listing.
    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let state = FilterState {
            category: Selection::category(category),
            ..Default::default()
        };
        Ok(filter_owned(self.list_products().await?, &state))
    }

    /// Products whose detail or brand contains `term`. Defaults to filtering
    /// the full listing.
    async fn search_products(&self, term: &str) -> Result<Vec<Product>, ApiError> {
        let state = FilterState {
            search: term.to_string(),
            ..Default::default()
        };
        Ok(filter_owned(self.list_products().await?, &state))
    }

    /// Persist a new product; returns it with its assigned id
    async fn create_product(&self, product: &Product) -> Result<Product, ApiError>;

    async fn update_product(&self, id: i64, product: &Product) -> Result<Product, ApiError>;

    async fn delete_product(&self, id: i64) -> Result<(), ApiError>;
}

/// Sale storage and reporting
#[allow(async_fn_in_trait)]
pub trait SalesApi {
    async fn list_sales(&self) -> Result<Vec<Sale>, ApiError>;

    async fn create_sale(&self, sale: &Sale) -> Result<Sale, ApiError>;

    async fn update_sale(&self, id: i64, sale: &Sale) -> Result<Sale, ApiError>;

    async fn delete_sale(&self, id: i64) -> Result<(), ApiError>;

    /// Totals computed by the backend
    async fn sales_summary(&self) -> Result<SalesSummary, ApiError>;
}

fn filter_owned(products: Vec<Product>, state: &FilterState) -> Vec<Product> {
    // Product filters never look at dates, so any day will do
    let today = chrono::NaiveDate::MIN;
    products.into_iter().filter(|p| state.admits(p, today)).collect()
}
