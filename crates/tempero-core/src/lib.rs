//! Tempero core
//!
//! View logic for the Tempero inventory and sales client: date normalization,
//! record filtering, pagination, profit figures, form validation and the
//! mutation services that sit between a front-end and the backend API.
//!
//! Nothing here talks HTTP. The backend is reached through the [`api`] traits,
//! and outcomes are reported through a [`notify::Notifier`].

pub mod api;
pub mod checkout;
pub mod dates;
pub mod error;
pub mod filter;
pub mod models;
pub mod money;
pub mod notify;
pub mod pagination;
pub mod services;
pub mod validation;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ProductApi, SalesApi};
pub use checkout::{Cart, CartLine};
pub use dates::{CalendarDate, Clock, FixedClock, SystemClock, normalize};
pub use error::{ApiError, ServiceError, ValidationError};
pub use filter::{FilterState, Record, Selection, TimeWindow};
pub use models::{PaymentMethod, Product, Sale, SalesSummary};
pub use notify::{Level, LogNotifier, Notification, Notifier, Outbox};
pub use pagination::{PageLink, Pagination};
pub use services::{InventoryService, SalesService};
pub use view::{InventoryView, RecordView, RefreshTicket, SalesView};
