use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use log::info;

use titanic_survival_api::{AppState, ServerConfig, loader, routes};

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    info!("🚢 Titanic Survival Prediction API");

    let model = loader::load_model(config.model_path());
    let state = web::Data::new(AppState::new(model));

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::configure)
    });

    if let Some(workers) = config.workers() {
        server = server.workers(workers.get());
    }

    let addr = config.addr();
    let server = server
        .bind(&addr)
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("🌐 Server: http://{addr}");
    info!("✅ Ready to receive predictions");

    server.run().await.context("http server failed")?;
    info!("wrapping up, shutting down...");

    Ok(())
}
