// src/main.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use postboard::config::{self, Settings, StoreBackend};
use postboard::models::RESOURCES;
use postboard::repositories::{MemoryStore, PgStore, RecordStore};
use postboard::{AppState, configure};

async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn RecordStore>> {
    match (settings.backend, &settings.postgres) {
        (StoreBackend::Postgres, Some(pg)) => {
            info!("Using postgres store at {}:{}/{}", pg.host, pg.port, pg.dbname);
            let store = PgStore::new(config::get_pg_pool(pg)?);
            store.ensure_tables(&RESOURCES).await?;
            Ok(Arc::new(store))
        }
        (StoreBackend::Postgres, None) => anyhow::bail!("postgres settings missing"),
        (StoreBackend::Memory, _) => {
            info!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match build_store(&settings).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialise store: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(store));
    let allowed_origins = settings.allowed_origins.clone();
    let bind_address = settings.bind_address();

    info!("server listening on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["content-type", "accept", "x-requested-with"])
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
