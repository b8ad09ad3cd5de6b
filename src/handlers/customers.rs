use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::dto::{CustomerDto, NewCustomerDto};
use crate::application::DynCustomerService;
use crate::auth::CurrentPrincipal;
use crate::domain::customer::{Address, Customer, CustomerSummary};
use crate::domain::page::{Page, DEFAULT_PAGE_SIZE};
use crate::errors::AppError;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CityResponse {
    pub id: i32,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: i32,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub zip_code: String,
    pub city: CityResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub document: String,
    /// `INDIVIDUAL` or `LEGAL_ENTITY`
    pub kind: String,
    pub profiles: Vec<String>,
    pub addresses: Vec<AddressResponse>,
    pub phones: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSummaryResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerPageResponse {
    pub content: Vec<CustomerSummaryResponse>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: i64,
    pub size: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PictureResponse {
    pub uri: String,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            street: a.street,
            number: a.number,
            complement: a.complement,
            district: a.district,
            zip_code: a.zip_code,
            city: CityResponse {
                id: a.city.id,
                name: a.city.name,
                state: a.city.state,
            },
        }
    }
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            document: c.document,
            kind: c.kind.as_str().to_string(),
            profiles: c.profiles.iter().map(|p| p.as_str().to_string()).collect(),
            addresses: c.addresses.into_iter().map(AddressResponse::from).collect(),
            phones: c.phones.into_iter().collect(),
        }
    }
}

impl From<CustomerSummary> for CustomerSummaryResponse {
    fn from(c: CustomerSummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
        }
    }
}

impl From<Page<CustomerSummary>> for CustomerPageResponse {
    fn from(page: Page<CustomerSummary>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(CustomerSummaryResponse::from);
        Self {
            content: page.content,
            total_elements: page.total_elements,
            total_pages,
            number: page.number,
            size: page.size,
        }
    }
}

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerPageParams {
    /// Page number (0-based). Defaults to 0.
    #[serde(default)]
    pub page: i64,
    /// Items per page. Defaults to 24, maximum 100.
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: i64,
    /// `name`, `email` or `id`. Defaults to `name`.
    #[serde(default = "default_order_by")]
    pub order_by: String,
    /// `ASC` or `DESC`. Defaults to `ASC`.
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_lines_per_page() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_order_by() -> String {
    "name".to_string()
}

fn default_direction() -> String {
    "ASC".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailParams {
    pub value: String,
}

fn blocking_error(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /customers/{id}
///
/// Admins may read any customer; customers only themselves.
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin and not the owner"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let customer = web::block(move || service.find(principal.get(), id))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// GET /customers/email?value=
#[utoipa::path(
    get,
    path = "/customers/email",
    params(("value" = String, Query, description = "Customer email")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin and not the owner of this email"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn get_customer_by_email(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    query: web::Query<EmailParams>,
) -> Result<HttpResponse, AppError> {
    let email = query.into_inner().value;

    let customer = web::block(move || service.find_by_email(principal.get(), &email))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// GET /customers
///
/// Admin only. Returns every customer ordered by name.
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = [CustomerSummaryResponse]),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
) -> Result<HttpResponse, AppError> {
    let customers = web::block(move || service.find_all(principal.get()))
        .await
        .map_err(blocking_error)??;

    let body: Vec<CustomerSummaryResponse> = customers
        .into_iter()
        .map(CustomerSummaryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /customers/page
///
/// Admin only. Zero-based pagination with a sort field and direction.
#[utoipa::path(
    get,
    path = "/customers/page",
    params(
        ("page" = Option<i64>, Query, description = "Page number (0-based, default 0)"),
        ("lines_per_page" = Option<i64>, Query, description = "Items per page (default 24, max 100)"),
        ("order_by" = Option<String>, Query, description = "name | email | id (default name)"),
        ("direction" = Option<String>, Query, description = "ASC | DESC (default ASC)"),
    ),
    responses(
        (status = 200, description = "Page of customers", body = CustomerPageResponse),
        (status = 400, description = "Unknown sort field or direction"),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin"),
    ),
    tag = "customers"
)]
pub async fn page_customers(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    query: web::Query<CustomerPageParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let page = web::block(move || {
        service.find_page(
            principal.get(),
            params.page,
            params.lines_per_page,
            &params.order_by,
            &params.direction,
        )
    })
    .await
    .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(CustomerPageResponse::from(page)))
}

/// POST /customers
///
/// Registers a customer with its first address and phones in a single
/// transaction. No authentication required.
#[utoipa::path(
    post,
    path = "/customers",
    request_body = NewCustomerDto,
    responses(
        (status = 201, description = "Customer created", body = CreatedResponse),
        (status = 400, description = "Invalid payload or unknown city"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    service: web::Data<DynCustomerService>,
    body: web::Json<NewCustomerDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();

    let customer = web::block(move || {
        let new_customer = service.from_new_dto(dto)?;
        service.insert(new_customer)
    })
    .await
    .map_err(blocking_error)??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/customers/{}", customer.id)))
        .json(CreatedResponse { id: customer.id }))
}

/// PUT /customers/{id}
///
/// Updates name and email.
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerDto,
    responses(
        (status = 204, description = "Customer updated"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin and not the owner"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    path: web::Path<i32>,
    body: web::Json<CustomerDto>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let dto = body.into_inner();

    web::block(move || {
        let changes = service.from_dto(dto)?;
        service.update(principal.get(), id, changes)
    })
    .await
    .map_err(blocking_error)??;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /customers/{id}
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "No authenticated principal"),
        (status = 403, description = "Not an admin and not the owner"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer has orders"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete(principal.get(), id))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /customers/picture
///
/// Raw image bytes in the body. Stored as a square JPEG named after the
/// caller's id; the response carries the public URL.
#[utoipa::path(
    post,
    path = "/customers/picture",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Picture stored", body = PictureResponse),
        (status = 400, description = "Empty or unreadable image"),
        (status = 401, description = "No authenticated principal"),
    ),
    tag = "customers"
)]
pub async fn upload_picture(
    service: web::Data<DynCustomerService>,
    principal: CurrentPrincipal,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let uri = service
        .upload_profile_picture(principal.get(), body.to_vec())
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, uri.clone()))
        .json(PictureResponse { uri }))
}
