//! In-memory backend for service and view tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use crate::api::{ProductApi, SalesApi};
use crate::error::ApiError;
use crate::models::{Product, Sale, SalesSummary};

pub fn product(id: Option<i64>, detail: &str, stock: u32) -> Product {
    Product {
        id,
        category: "Temperos".to_string(),
        detail: detail.to_string(),
        brand: "Kitano".to_string(),
        purchase_price: 2.0,
        sale_price: 5.0,
        stock_quantity: stock,
        expiration: "2026-05-01".to_string(),
    }
}

pub fn sale(id: i64, date: &str, category: &str) -> Sale {
    Sale {
        id: Some(id),
        sale_date: date.to_string(),
        category: category.to_string(),
        product: format!("Item {}", id),
        brand: "Kitano".to_string(),
        purchase_price: Some(2.0),
        sale_price: 5.0,
        quantity_sold: Some(1),
        payment_method: "dinheiro".to_string(),
        profit: None,
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    products: Mutex<Vec<Product>>,
    sales: Mutex<Vec<Sale>>,
    summary: Mutex<SalesSummary>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl MemoryBackend {
    pub fn with_products(products: Vec<Product>) -> Self {
        let backend = Self::default();
        backend.next_id.store(1000, Ordering::SeqCst);
        *backend.products.lock().unwrap() = products;
        backend
    }

    pub fn with_sales(sales: Vec<Sale>, summary: SalesSummary) -> Self {
        let backend = Self::default();
        backend.next_id.store(1000, Ordering::SeqCst);
        *backend.sales.lock().unwrap() = sales;
        *backend.summary.lock().unwrap() = summary;
        backend
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.sales.lock().unwrap().clone()
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next backend call fail with a 500
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::Status {
            status: 404,
            body: format!("{} not found", id),
        }
    }
}

impl ProductApi for MemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.enter()?;
        Ok(self.products())
    }

    async fn find_product(&self, id: i64) -> Result<Product, ApiError> {
        self.enter()?;
        self.products()
            .into_iter()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.enter()?;
        let mut saved = product.clone();
        saved.id = Some(self.assign_id());
        self.products.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update_product(&self, id: i64, product: &Product) -> Result<Product, ApiError> {
        self.enter()?;
        let mut products = self.products.lock().unwrap();
        let slot = products.iter_mut().find(|p| p.id == Some(id)).ok_or_else(|| Self::not_found(id))?;
        *slot = product.clone();
        slot.id = Some(id);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.enter()?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != Some(id));
        if products.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

impl SalesApi for MemoryBackend {
    async fn list_sales(&self) -> Result<Vec<Sale>, ApiError> {
        self.enter()?;
        Ok(self.sales())
    }

    async fn create_sale(&self, sale: &Sale) -> Result<Sale, ApiError> {
        self.enter()?;
        let mut saved = sale.clone();
        saved.id = Some(self.assign_id());
        self.sales.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update_sale(&self, id: i64, sale: &Sale) -> Result<Sale, ApiError> {
        self.enter()?;
        let mut sales = self.sales.lock().unwrap();
        let slot = sales.iter_mut().find(|s| s.id == Some(id)).ok_or_else(|| Self::not_found(id))?;
        *slot = sale.clone();
        slot.id = Some(id);
        Ok(slot.clone())
    }

    async fn delete_sale(&self, id: i64) -> Result<(), ApiError> {
        self.enter()?;
        let mut sales = self.sales.lock().unwrap();
        let before = sales.len();
        sales.retain(|s| s.id != Some(id));
        if sales.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn sales_summary(&self) -> Result<SalesSummary, ApiError> {
        self.enter()?;
        Ok(*self.summary.lock().unwrap())
    }
}
