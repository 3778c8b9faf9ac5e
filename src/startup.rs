use crate::catalog_client::{CatalogService, PgCatalogService};
use crate::configuration::{PaymentSettings, SecretSetting, Settings};
use crate::database::get_connection_pool;
use crate::routes::main_route;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        tracing::info!("Listening on {}", address);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            configuration.secret,
            configuration.payment,
            configuration.application.workers,
        )
        .await?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // Only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    secret: SecretSetting,
    payment: PaymentSettings,
    workers: usize,
) -> Result<Server, anyhow::Error> {
    let catalog_service: Arc<dyn CatalogService> =
        Arc::new(PgCatalogService::new(db_pool.clone()));
    let catalog_data = web::Data::from(catalog_service);
    let db_pool = web::Data::new(db_pool);
    let secret_obj = web::Data::new(secret);
    let payment_obj = web::Data::new(payment);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // Dashboard and ordering page run on other origins.
            .wrap(Cors::permissive())
            .app_data(db_pool.clone())
            .app_data(catalog_data.clone())
            .app_data(secret_obj.clone())
            .app_data(payment_obj.clone())
            .configure(main_route)
    })
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}
