//! Mutation services
//!
//! Each operation validates, calls the backend, and reports the outcome through
//! a [`Notifier`] with a fixed message. Nothing is applied locally: after a
//! success the caller refreshes its snapshot.

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::{ProductApi, SalesApi};
use crate::checkout::Cart;
use crate::error::{ApiError, ServiceError, ValidationError};
use crate::models::{Product, Sale};
use crate::notify::{Notification, Notifier};
use crate::validation::{FormMode, validate_product, validate_sale};

/// Fixed user-facing messages, one pair per operation
pub mod messages {
    pub const PRODUCT_SAVED: &str = "Product saved successfully!";
    pub const PRODUCT_SAVE_FAILED: &str = "Failed to save the product.";
    pub const PRODUCT_UPDATED: &str = "Product updated successfully!";
    pub const PRODUCT_UPDATE_FAILED: &str = "Failed to update the product.";
    pub const PRODUCT_REMOVED: &str = "Product removed successfully!";
    pub const PRODUCT_REMOVE_FAILED: &str = "Failed to remove the product.";

    pub const SALE_RECORDED: &str = "Sale recorded successfully!";
    pub const SALE_FAILED: &str = "The sale was not completed!";
    pub const SALE_UPDATED: &str = "Sale updated successfully!";
    pub const SALE_UPDATE_FAILED: &str = "Failed to update the sale.";
    pub const SALE_REMOVED: &str = "Sale removed successfully!";
    pub const SALE_REMOVE_FAILED: &str = "Failed to remove the sale.";

    pub const PRODUCTS_LOAD_FAILED: &str = "Failed to load products.";
    pub const SALES_LOAD_FAILED: &str = "Failed to load sales.";
    pub const SUMMARY_LOAD_FAILED: &str = "Failed to load the sales summary.";
}

use messages::*;

fn rejected(notifier: &impl Notifier, err: ValidationError) -> ServiceError {
    warn!("Rejected input: {}", err);
    notifier.notify(err.notification());
    err.into()
}

fn failed(notifier: &impl Notifier, err: ApiError, message: &str) -> ServiceError {
    warn!("{} ({})", message, err);
    notifier.notify(Notification::error(message));
    err.into()
}

/// Product create/update/delete
pub struct InventoryService<'a, A, N> {
    api: &'a A,
    notifier: &'a N,
}

impl<'a, A: ProductApi, N: Notifier> InventoryService<'a, A, N> {
    pub fn new(api: &'a A, notifier: &'a N) -> Self {
        Self { api, notifier }
    }

    /// Create a product. `existing` is the current snapshot, used for the
    /// duplicate-description check.
    pub async fn create(&self, product: &Product, existing: &[Product]) -> Result<Product, ServiceError> {
        validate_product(product, existing, FormMode::Insert).map_err(|e| rejected(self.notifier, e))?;

        let saved = self
            .api
            .create_product(product)
            .await
            .map_err(|e| failed(self.notifier, e, PRODUCT_SAVE_FAILED))?;

        info!(id = ?saved.id, detail = %saved.detail, "Product created");
        self.notifier.notify(Notification::success(PRODUCT_SAVED));
        Ok(saved)
    }

    pub async fn update(&self, id: i64, product: &Product, existing: &[Product]) -> Result<Product, ServiceError> {
        let mut product = product.clone();
        product.id = Some(id);
        validate_product(&product, existing, FormMode::Edit).map_err(|e| rejected(self.notifier, e))?;

        let saved = self
            .api
            .update_product(id, &product)
            .await
            .map_err(|e| failed(self.notifier, e, PRODUCT_UPDATE_FAILED))?;

        info!(id, "Product updated");
        self.notifier.notify(Notification::success(PRODUCT_UPDATED));
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.api
            .delete_product(id)
            .await
            .map_err(|e| failed(self.notifier, e, PRODUCT_REMOVE_FAILED))?;

        info!(id, "Product removed");
        self.notifier.notify(Notification::success(PRODUCT_REMOVED));
        Ok(())
    }
}

/// Sale recording, editing and removal
pub struct SalesService<'a, A, N> {
    api: &'a A,
    notifier: &'a N,
}

impl<'a, A: SalesApi, N: Notifier> SalesService<'a, A, N> {
    pub fn new(api: &'a A, notifier: &'a N) -> Self {
        Self { api, notifier }
    }

    /// Record one sale per cart line, all dated `today`.
    ///
    /// The creations run concurrently and are not rolled back: if one fails,
    /// the checkout is reported as failed even though the other lines may
    /// already be stored. The number of stored lines is logged.
    pub async fn checkout(&self, cart: &Cart, today: NaiveDate) -> Result<Vec<Sale>, ServiceError> {
        cart.validate().map_err(|e| rejected(self.notifier, e))?;

        let sales = cart.to_sales(today);
        debug!(lines = sales.len(), total = cart.total(), "Submitting checkout");

        let results = join_all(sales.iter().map(|sale| self.api.create_sale(sale))).await;
        let mut saved = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(sale) => saved.push(sale),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            warn!(saved = saved.len(), lines = sales.len(), "Checkout partially stored");
            return Err(failed(self.notifier, e, SALE_FAILED));
        }

        info!(lines = saved.len(), payment = %cart.payment, "Sale recorded");
        self.notifier.notify(Notification::success(SALE_RECORDED));
        Ok(saved)
    }

    pub async fn update(&self, id: i64, sale: &Sale) -> Result<Sale, ServiceError> {
        let payment = validate_sale(sale).map_err(|e| rejected(self.notifier, e))?;

        let mut sale = sale.clone();
        sale.id = Some(id);
        sale.payment_method = payment.as_str().to_string();
        let saved = self
            .api
            .update_sale(id, &sale)
            .await
            .map_err(|e| failed(self.notifier, e, SALE_UPDATE_FAILED))?;

        info!(id, "Sale updated");
        self.notifier.notify(Notification::success(SALE_UPDATED));
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.api
            .delete_sale(id)
            .await
            .map_err(|e| failed(self.notifier, e, SALE_REMOVE_FAILED))?;

        info!(id, "Sale removed");
        self.notifier.notify(Notification::success(SALE_REMOVED));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::notify::{Level, Outbox};
    use crate::testing::{MemoryBackend, product};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[tokio::test]
    async fn test_create_product_notifies_success() {
        let backend = MemoryBackend::default();
        let outbox = Outbox::new();
        let service = InventoryService::new(&backend, &outbox);

        let saved = service.create(&product(None, "Colorau", 10), &[]).await.unwrap();

        assert!(saved.id.is_some());
        assert_eq!(backend.products().len(), 1);
        assert_eq!(outbox.latest(), Some(Notification::success(PRODUCT_SAVED)));
    }

    #[tokio::test]
    async fn test_duplicate_product_never_reaches_backend() {
        let backend = MemoryBackend::with_products(vec![product(Some(1), "Colorau", 10)]);
        let outbox = Outbox::new();
        let service = InventoryService::new(&backend, &outbox);
        let existing = backend.products();

        let result = service.create(&product(None, "COLORAU", 3), &existing).await;

        assert!(matches!(result, Err(ServiceError::Invalid(ValidationError::DuplicateDetail(_)))));
        assert_eq!(backend.products().len(), 1);
        assert_eq!(backend.calls(), 0);
        assert_eq!(outbox.latest().map(|n| n.level), Some(Level::Error));
    }

    #[tokio::test]
    async fn test_backend_failure_uses_fixed_message() {
        let backend = MemoryBackend::default();
        backend.fail_next();
        let outbox = Outbox::new();
        let service = InventoryService::new(&backend, &outbox);

        let result = service.create(&product(None, "Colorau", 10), &[]).await;

        assert!(matches!(result, Err(ServiceError::Api(_))));
        assert!(backend.products().is_empty());
        assert_eq!(outbox.latest(), Some(Notification::error(PRODUCT_SAVE_FAILED)));
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let backend = MemoryBackend::with_products(vec![product(Some(1), "Colorau", 10)]);
        let outbox = Outbox::new();
        let service = InventoryService::new(&backend, &outbox);
        let existing = backend.products();

        let mut edited = existing[0].clone();
        edited.sale_price = 7.5;
        service.update(1, &edited, &existing).await.unwrap();
        assert_eq!(backend.products()[0].sale_price, 7.5);
        assert_eq!(outbox.latest(), Some(Notification::success(PRODUCT_UPDATED)));

        service.delete(1).await.unwrap();
        assert!(backend.products().is_empty());
        assert_eq!(outbox.latest(), Some(Notification::success(PRODUCT_REMOVED)));
    }

    #[tokio::test]
    async fn test_delete_missing_product_fails() {
        let backend = MemoryBackend::default();
        let outbox = Outbox::new();
        let service = InventoryService::new(&backend, &outbox);

        assert!(service.delete(42).await.is_err());
        assert_eq!(outbox.latest(), Some(Notification::error(PRODUCT_REMOVE_FAILED)));
    }

    #[tokio::test]
    async fn test_checkout_records_one_sale_per_line() {
        let backend = MemoryBackend::with_products(vec![product(Some(1), "Colorau", 10), product(Some(2), "Cominho", 5)]);
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);

        let cart = Cart::from_picks(&backend.products(), &[(1, 2), (2, 1)], PaymentMethod::Pix).unwrap();
        let saved = service.checkout(&cart, today()).await.unwrap();

        assert_eq!(saved.len(), 2);
        let sales = backend.sales();
        assert_eq!(sales.len(), 2);
        assert!(sales.iter().all(|s| s.sale_date == "2025-03-07" && s.payment_method == "pix"));
        assert_eq!(outbox.latest(), Some(Notification::success(SALE_RECORDED)));
    }

    #[tokio::test]
    async fn test_checkout_requires_selection() {
        let backend = MemoryBackend::default();
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);

        let result = service.checkout(&Cart::default(), today()).await;

        assert!(result.is_err());
        assert_eq!(outbox.latest(), Some(Notification::warning("Select at least one product.")));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_checkout_failure() {
        let backend = MemoryBackend::with_products(vec![product(Some(1), "Colorau", 10)]);
        backend.fail_next();
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);

        let cart = Cart::from_picks(&backend.products(), &[(1, 1)], PaymentMethod::Dinheiro).unwrap();
        assert!(service.checkout(&cart, today()).await.is_err());
        assert_eq!(outbox.latest(), Some(Notification::error(SALE_FAILED)));
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_stored_lines() {
        let backend = MemoryBackend::with_products(vec![product(Some(1), "Colorau", 10), product(Some(2), "Cominho", 5)]);
        backend.fail_next();
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);

        let cart = Cart::from_picks(&backend.products(), &[(1, 1), (2, 1)], PaymentMethod::Pix).unwrap();
        let result = service.checkout(&cart, today()).await;

        assert!(matches!(result, Err(ServiceError::Api(_))));
        assert_eq!(backend.calls(), 2);
        assert_eq!(backend.sales().len(), 1);
        assert_eq!(outbox.latest(), Some(Notification::error(SALE_FAILED)));
    }

    #[tokio::test]
    async fn test_update_sale_stores_canonical_payment() {
        let backend = MemoryBackend::default();
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);
        let cart = Cart::from_picks(&[product(Some(1), "Colorau", 10)], &[(1, 1)], PaymentMethod::Dinheiro).unwrap();
        let saved = service.checkout(&cart, today()).await.unwrap();
        let id = saved[0].id.unwrap();

        let mut sale = saved[0].clone();
        sale.payment_method = "Credit".to_string();
        let updated = service.update(id, &sale).await.unwrap();

        assert_eq!(updated.payment_method, "credito");
        assert_eq!(backend.sales()[0].payment_method, "credito");
    }

    #[tokio::test]
    async fn test_update_sale_validates_payment() {
        let backend = MemoryBackend::default();
        let outbox = Outbox::new();
        let service = SalesService::new(&backend, &outbox);
        let cart = Cart::from_picks(&[product(Some(1), "Colorau", 10)], &[(1, 1)], PaymentMethod::Dinheiro).unwrap();
        let saved = service.checkout(&cart, today()).await.unwrap();
        let id = saved[0].id.unwrap();

        let mut sale = saved[0].clone();
        sale.payment_method = "fiado".to_string();
        assert!(service.update(id, &sale).await.is_err());
        assert_eq!(outbox.latest(), Some(Notification::warning("Choose a valid payment method.")));

        sale.payment_method = "credito".to_string();
        sale.quantity_sold = Some(3);
        service.update(id, &sale).await.unwrap();
        assert_eq!(backend.sales()[0].quantity_sold, Some(3));

        service.delete(id).await.unwrap();
        assert!(backend.sales().is_empty());
        assert_eq!(outbox.latest(), Some(Notification::success(SALE_REMOVED)));
    }
}
