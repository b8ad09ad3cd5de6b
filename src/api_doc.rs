use utoipa::OpenApi;

use crate::application::dto::{CustomerDto, NewCustomerDto, OrderLineDto};
use crate::handlers::{customers, orders};

#[derive(OpenApi)]
#[openapi(
    paths(
        customers::get_customer,
        customers::get_customer_by_email,
        customers::list_customers,
        customers::page_customers,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::upload_picture,
        orders::create_order,
        orders::get_order,
        orders::list_orders,
    ),
    components(schemas(
        CustomerDto,
        NewCustomerDto,
        customers::CityResponse,
        customers::AddressResponse,
        customers::CustomerResponse,
        customers::CustomerSummaryResponse,
        customers::CustomerPageResponse,
        customers::CreatedResponse,
        customers::PictureResponse,
        OrderLineDto,
        orders::CreateOrderRequest,
        orders::CreateOrderResponse,
        orders::OrderLineResponse,
        orders::OrderResponse,
        orders::ListOrdersResponse,
    )),
    tags(
        (name = "customers", description = "Customer registration and lookup"),
        (name = "orders", description = "Order placement and lookup"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/customers",
            "/customers/{id}",
            "/customers/email",
            "/customers/page",
            "/customers/picture",
            "/orders",
            "/orders/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
