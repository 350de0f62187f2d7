use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use car_rental_api::config::AppConfig;
use car_rental_api::db::memory::create_store;
use car_rental_api::routes;
use car_rental_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    log::info!("Starting in {} mode", config.environment);

    let store = create_store(&config)
        .await
        .map_err(std::io::Error::other)?;

    let bind = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::new(store, config));

    log::info!("Binding to {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
