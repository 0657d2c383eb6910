use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use gymgate::appwrite::AppwriteStore;
use gymgate::config::{self, Collections, StoreConfig};
use gymgate::routes;
use gymgate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let store_config = StoreConfig::from_env()?;
    let state = AppState {
        store: Arc::new(AppwriteStore::new(&store_config)),
        collections: Collections::from_env(),
    };

    let port = config::server_port();
    let address = format!("0.0.0.0:{port}");
    log::info!("Starting GymGate on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::bookings::configure)
            .configure(routes::appointments::configure)
            .configure(routes::checkin::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
