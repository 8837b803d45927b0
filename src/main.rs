use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use default_predictor::api::{assets, configure_routes, AppState};
use default_predictor::{banner, config};
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is fine; every setting has a default.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    banner::print_banner(&app_config.endpoint);

    let bind = app_config.bind.clone();
    let state = AppState::new(app_config);

    info!("🚀 Starting server...");
    info!("📡 Forwarding predictions to {}", state.service.endpoint());
    info!("📊 Form available at http://{}", bind);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .route("/{_:.*}", web::get().to(assets::static_file_handler))
    })
    .bind(bind)?
    .run()
    .await
}
