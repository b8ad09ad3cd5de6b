pub mod customer_service;
pub mod dto;
pub mod order_service;

use std::fmt::Display;
use std::sync::Arc;

use log::warn;

use crate::domain::access::{Decision, Principal};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CustomerRepository, OrderRepository};

pub use customer_service::{CustomerService, ProfilePictureSettings};
pub use order_service::OrderService;

pub type DynCustomerService = CustomerService<Arc<dyn CustomerRepository>>;
pub type DynOrderService = OrderService<Arc<dyn OrderRepository>>;

/// Turn a guard decision into a result, logging denials.
pub(crate) fn enforce(
    decision: Decision,
    principal: Option<&Principal>,
    target: impl Display,
) -> Result<(), DomainError> {
    if let Decision::Deny(reason) = decision {
        warn!(
            "access denied ({}): principal={:?} target={}",
            reason,
            principal.map(|p| p.id),
            target
        );
    }
    decision.into_result()
}
