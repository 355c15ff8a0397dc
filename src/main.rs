//! Movie Rating HTTP Server
//!
//! Standalone HTTP server for a pre-trained rating model

use movie_rating::Result;

#[cfg(feature = "http-server")]
#[actix_rt::main]
async fn main() -> Result<()> {
    use actix_web::{middleware, web, App, HttpServer};
    use clap::Parser;
    use movie_rating::api::{configure_routes, init_api_server_state};
    use movie_rating::cli::Cli;

    // Load configuration
    let config = Cli::parse().into_config()?;

    // Initialize logger
    movie_rating::init_logging(config.app.debug)?;

    log::info!("Starting {} {}", config.app.name, config.app.version);
    log::info!(
        "Serving {} predictions from {}",
        config.model.mode,
        config.model.path.display()
    );

    // Load the model once; every worker shares the same state
    let api_state = init_api_server_state(&config);
    if !api_state.is_model_loaded() {
        log::warn!("No model loaded; /predict will answer 503 until the server is restarted with a valid artifact");
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    let workers = config.server.workers;
    let mode = config.model.mode;

    log::info!("Server will listen on {}:{} with {} workers", host, port, workers);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(api_state.clone()))
            .configure(|cfg| configure_routes(cfg, mode))
    })
    .workers(workers)
    .bind((host.as_str(), port))?
    .run()
    .await?;

    log::info!("Server stopped.");

    Ok(())
}

#[cfg(not(feature = "http-server"))]
fn main() -> Result<()> {
    eprintln!("HTTP server feature is not enabled.");
    eprintln!("Please compile with: cargo build --features http-server");
    std::process::exit(1);
}
