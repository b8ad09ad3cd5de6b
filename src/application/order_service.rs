use std::str::FromStr;

use bigdecimal::BigDecimal;
use log::info;

use crate::domain::access::{AccessGuard, CustomerId, Principal, ResourceKind, ResourceRef};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderId, OrderLineInput, OrderView};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::OrderRepository;

use super::dto::OrderLineDto;
use super::enforce;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Customers place orders for themselves; admins may place them for anyone.
    pub fn create_order(
        &self,
        principal: Option<&Principal>,
        customer_id: CustomerId,
        lines: Vec<OrderLineDto>,
    ) -> Result<OrderId, DomainError> {
        let owner = ResourceRef::new(ResourceKind::Order, customer_id);
        enforce(
            AccessGuard::authorize_resource(principal, &owner),
            principal,
            format_args!("new order for customer {}", customer_id),
        )?;
        let lines = parse_lines(lines)?;
        validate_lines(&lines)?;
        let id = self.repo.create(customer_id, lines)?;
        info!("order {} created for customer {}", id, customer_id);
        Ok(id)
    }

    /// The owner of an order is only known once it is loaded, so the caller
    /// must be authenticated up front and ownership is checked after the load.
    /// A missing order is reported as `NotFound` to admins only; everyone else
    /// gets `Forbidden`, the same answer as for a foreign order.
    pub fn get_order(&self, principal: Option<&Principal>, id: OrderId) -> Result<OrderView, DomainError> {
        let target = format!("{} {}", ResourceKind::Order, id);
        enforce(AccessGuard::require_authenticated(principal), principal, &target)?;

        let Some(order) = self.repo.find_by_id(id)? else {
            enforce(AccessGuard::require_admin(principal), principal, &target)?;
            return Err(DomainError::not_found(ResourceKind::Order.as_str(), id));
        };

        let owner = ResourceRef::new(ResourceKind::Order, order.customer_id);
        enforce(
            AccessGuard::authorize_resource(principal, &owner),
            principal,
            &target,
        )?;
        Ok(order)
    }

    pub fn list_orders(
        &self,
        principal: Option<&Principal>,
        page: i64,
        limit: i64,
    ) -> Result<Page<OrderView>, DomainError> {
        enforce(AccessGuard::require_admin(principal), principal, "order list")?;
        self.repo.list(PageRequest::new(page, limit))
    }
}

fn parse_lines(lines: Vec<OrderLineDto>) -> Result<Vec<OrderLineInput>, DomainError> {
    lines
        .into_iter()
        .map(|l| {
            let unit_price = BigDecimal::from_str(l.unit_price.trim()).map_err(|e| {
                DomainError::InvalidInput(format!("invalid unit_price '{}': {}", l.unit_price, e))
            })?;
            Ok(OrderLineInput {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price,
            })
        })
        .collect()
}

fn validate_lines(lines: &[OrderLineInput]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::InvalidInput(
            "an order needs at least one line".to_string(),
        ));
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be positive",
                line.product_id
            )));
        }
        if line.unit_price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "unit price for product {} must not be negative",
                line.product_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{admin, customer_principal, InMemoryOrderRepository};

    fn line(price: &str) -> OrderLineDto {
        OrderLineDto {
            product_id: 10,
            quantity: 2,
            unit_price: price.to_string(),
        }
    }

    fn setup() -> OrderService<Arc<InMemoryOrderRepository>> {
        OrderService::new(Arc::new(InMemoryOrderRepository::new()))
    }

    #[test]
    fn customer_creates_and_reads_own_order() {
        let service = setup();
        let me = customer_principal(1, "maria@gmail.com");
        let id = service
            .create_order(Some(&me), 1, vec![line("9.99")])
            .unwrap();
        let order = service.get_order(Some(&me), id).unwrap();
        assert_eq!(order.customer_id, 1);
        assert_eq!(order.status, "PENDING");
        assert_eq!(order.lines.len(), 1);
    }

    #[test]
    fn customer_cannot_order_for_someone_else() {
        let service = setup();
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.create_order(Some(&me), 2, vec![line("1.00")]),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn customer_cannot_read_foreign_order() {
        let service = setup();
        let id = service
            .create_order(Some(&admin()), 2, vec![line("1.00")])
            .unwrap();
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.get_order(Some(&me), id),
            Err(DomainError::Forbidden)
        ));
        assert!(service.get_order(Some(&admin()), id).is_ok());
    }

    #[test]
    fn anonymous_read_is_unauthenticated_even_for_missing_order() {
        let service = setup();
        assert!(matches!(
            service.get_order(None, 77),
            Err(DomainError::Unauthenticated)
        ));
    }

    #[test]
    fn missing_order_is_not_found_for_admin_only() {
        let service = setup();
        assert!(matches!(
            service.get_order(Some(&admin()), 77),
            Err(DomainError::NotFound { kind: "Order", .. })
        ));
    }

    #[test]
    fn customer_cannot_tell_missing_order_from_foreign_one() {
        let service = setup();
        let foreign = service
            .create_order(Some(&admin()), 2, vec![line("1.00")])
            .unwrap();
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.get_order(Some(&me), 77),
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            service.get_order(Some(&me), foreign),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn authorization_runs_before_price_parsing() {
        let service = setup();
        assert!(matches!(
            service.create_order(None, 1, vec![line("nine")]),
            Err(DomainError::Unauthenticated)
        ));
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.create_order(Some(&me), 2, vec![line("nine")]),
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            service.create_order(Some(&me), 1, vec![line("nine")]),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn invalid_lines_are_rejected() {
        let service = setup();
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.create_order(Some(&me), 1, vec![]),
            Err(DomainError::InvalidInput(_))
        ));
        let mut zero = line("1.00");
        zero.quantity = 0;
        assert!(matches!(
            service.create_order(Some(&me), 1, vec![zero]),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            service.create_order(Some(&me), 1, vec![line("-0.01")]),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn listing_is_admin_only() {
        let service = setup();
        for _ in 0..3 {
            service
                .create_order(Some(&admin()), 1, vec![line("2.50")])
                .unwrap();
        }
        let me = customer_principal(1, "maria@gmail.com");
        assert!(matches!(
            service.list_orders(Some(&me), 0, 20),
            Err(DomainError::Forbidden)
        ));
        let page = service.list_orders(Some(&admin()), 0, 2).unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content.len(), 2);
    }
}
