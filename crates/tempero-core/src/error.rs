//! Error types at the library seams

use thiserror::Error;

use crate::notify::Notification;

/// Failure reported by a backend collaborator
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),
}

/// Input rejected before anything is sent to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: f64 },

    #[error("a product named \"{0}\" already exists")]
    DuplicateDetail(String),

    #[error("invalid payment method: {0}")]
    PaymentMethod(String),

    #[error("invalid sale date \"{0}\"")]
    SaleDate(String),

    #[error("no product selected")]
    EmptyCart,

    #[error("no product with id {0}")]
    UnknownProduct(i64),

    #[error("the product \"{0}\" is out of stock")]
    OutOfStock(String),
}

impl ValidationError {
    /// User-facing notification for this rejection
    pub fn notification(&self) -> Notification {
        match self {
            ValidationError::Required(_) | ValidationError::BelowMinimum { .. } | ValidationError::SaleDate(_) => {
                Notification::warning("Fill in all fields correctly!")
            }
            ValidationError::DuplicateDetail(detail) => {
                Notification::error(format!("A product named \"{}\" already exists.", detail))
            }
            ValidationError::PaymentMethod(_) => Notification::warning("Choose a valid payment method."),
            ValidationError::EmptyCart => Notification::warning("Select at least one product."),
            ValidationError::UnknownProduct(id) => Notification::error(format!("Product {} was not found.", id)),
            ValidationError::OutOfStock(detail) => {
                Notification::error(format!("The product \"{}\" is out of stock!", detail))
            }
        }
    }
}

/// Why a service call did not complete
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
