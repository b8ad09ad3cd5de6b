pub mod api_doc;
pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

use std::error::Error;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::application::{
    CustomerService, DynCustomerService, DynOrderService, OrderService, ProfilePictureSettings,
};
use crate::config::{AppConfig, ConfigError};
use crate::domain::ports::{CustomerRepository, OrderRepository};
use crate::infrastructure::{
    Argon2PasswordEncoder, DieselCityRepository, DieselCustomerRepository, DieselOrderRepository,
    JpegThumbnailer,
};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Upper bound for request bodies, profile pictures included.
const MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Application services shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub customers: web::Data<DynCustomerService>,
    pub orders: web::Data<DynOrderService>,
}

/// Wire the Diesel repositories and the configured storage into services.
pub fn build_services(pool: DbPool, config: &AppConfig) -> Result<AppServices, ConfigError> {
    let customers: Arc<dyn CustomerRepository> =
        Arc::new(DieselCustomerRepository::new(pool.clone()));
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));

    let customer_service = CustomerService::new(
        customers,
        Arc::new(DieselCityRepository::new(pool)),
        Arc::new(Argon2PasswordEncoder),
        Arc::new(JpegThumbnailer),
        config.storage.build()?,
        ProfilePictureSettings {
            prefix: config.profile_image_prefix.clone(),
            size: config.profile_image_size,
            public_base_url: config.storage_public_url.clone(),
        },
    );

    Ok(AppServices {
        customers: web::Data::new(customer_service),
        orders: web::Data::new(OrderService::new(orders)),
    })
}

/// Route table. Literal segments under `/customers` are registered before
/// `/customers/{id}` so they are not captured as ids.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(handlers::customers::list_customers))
            .route("", web::post().to(handlers::customers::create_customer))
            .route("/page", web::get().to(handlers::customers::page_customers))
            .route("/email", web::get().to(handlers::customers::get_customer_by_email))
            .route("/picture", web::post().to(handlers::customers::upload_picture))
            .route("/{id}", web::get().to(handlers::customers::get_customer))
            .route("/{id}", web::put().to(handlers::customers::update_customer))
            .route("/{id}", web::delete().to(handlers::customers::delete_customer)),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(handlers::orders::create_order))
            .route("", web::get().to(handlers::orders::list_orders))
            .route("/{id}", web::get().to(handlers::orders::get_order)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    services: AppServices,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(services.customers.clone())
            .app_data(services.orders.clone())
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
